//! Input variants and the on-node log sources they select.

/// Reserved input names a pipeline may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InputName {
    Application,
    Infrastructure,
    Audit,
}

impl InputName {
    pub const ALL: [InputName; 3] = [
        InputName::Application,
        InputName::Infrastructure,
        InputName::Audit,
    ];

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|input| input.as_str() == name)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InputName::Application => "application",
            InputName::Infrastructure => "infrastructure",
            InputName::Audit => "audit",
        }
    }

    /// Sources implied by selecting this variant, in canonical order.
    ///
    /// Infrastructure includes container logs because platform pods
    /// (kube-*, openshift-*, default) log through the same files as
    /// applications and are split off later by the container route.
    pub fn log_sources(self) -> &'static [LogSource] {
        match self {
            InputName::Application => &[LogSource::Container],
            InputName::Infrastructure => &[LogSource::Container, LogSource::Journal],
            InputName::Audit => &[
                LogSource::HostAudit,
                LogSource::KubernetesAudit,
                LogSource::OpenshiftAudit,
                LogSource::OvnAudit,
            ],
        }
    }
}

/// A concrete place logs are read from on the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogSource {
    Container,
    Journal,
    HostAudit,
    KubernetesAudit,
    OpenshiftAudit,
    OvnAudit,
}

impl LogSource {
    pub const ALL: [LogSource; 6] = [
        LogSource::Container,
        LogSource::Journal,
        LogSource::HostAudit,
        LogSource::KubernetesAudit,
        LogSource::OpenshiftAudit,
        LogSource::OvnAudit,
    ];

    /// Component id of the generated `[sources.<id>]` section.
    pub fn id(self) -> &'static str {
        match self {
            LogSource::Container => "container_logs",
            LogSource::Journal => "journal_logs",
            LogSource::HostAudit => "host_audit_logs",
            LogSource::KubernetesAudit => "k8s_audit_logs",
            LogSource::OpenshiftAudit => "openshift_audit_logs",
            LogSource::OvnAudit => "ovn_audit_logs",
        }
    }

    /// Position within the sources section.
    pub fn rank(self) -> u16 {
        self as u16
    }

    /// Fixed file read by the audit sources; `None` for non-file sources.
    pub fn audit_path(self) -> Option<&'static str> {
        match self {
            LogSource::HostAudit => Some("/var/log/audit/audit.log"),
            LogSource::KubernetesAudit => Some("/var/log/kube-apiserver/audit.log"),
            LogSource::OpenshiftAudit => Some("/var/log/oauth-apiserver.audit.log"),
            LogSource::OvnAudit => Some("/var/log/ovn/acl-audit-log.log"),
            LogSource::Container | LogSource::Journal => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_reserved_names_only() {
        assert_eq!(InputName::parse("audit"), Some(InputName::Audit));
        assert_eq!(InputName::parse("Audit"), None);
        assert_eq!(InputName::parse("custom"), None);
    }

    #[test]
    fn infrastructure_selects_container_and_journal() {
        assert_eq!(
            InputName::Infrastructure.log_sources(),
            &[LogSource::Container, LogSource::Journal]
        );
    }

    #[test]
    fn audit_sources_all_have_paths() {
        for source in InputName::Audit.log_sources() {
            assert!(source.audit_path().is_some(), "{:?}", source);
        }
        assert_eq!(LogSource::Journal.audit_path(), None);
    }
}
