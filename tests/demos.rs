use collector_confgen::render;
use collector_confgen::topology::{Secrets, Topology};

const TOPOLOGY: &str = include_str!("../demos/topology.json");
const SECRETS: &str = include_str!("../demos/secrets.json");

#[test]
fn demo_inputs_render() {
    let topology: Topology = serde_json::from_str(TOPOLOGY).unwrap();
    let secrets: Secrets = serde_json::from_str(SECRETS).unwrap();
    let conf = render(&topology, &secrets).unwrap();

    assert!(conf.contains("[sinks.es.auth]"));
    assert!(conf.contains(r#"password = "${SECRET_ES_SECRET_PASSWORD}""#));
    assert!(conf.contains("[sinks.default.tls]"));
    assert!(conf.contains(r#"inputs = ["audit_to_loki"]"#));
    assert!(!conf.contains("changeme"));
}
