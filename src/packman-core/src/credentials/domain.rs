use serde::{Deserialize, Serialize};
use url::Url;

/// A property of the target URL that stored credentials must be valid for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DomainRequirement {
    Scheme(String),
    Hostname(String),
    HostnamePort { hostname: String, port: u16 },
    Path(String),
}

/// Requirements describing `url`, used to select credentials for it.
pub fn domain_requirements(url: &Url) -> Vec<DomainRequirement> {
    let mut requirements = vec![DomainRequirement::Scheme(url.scheme().to_string())];
    if let Some(host) = url.host_str() {
        requirements.push(DomainRequirement::Hostname(host.to_string()));
        if let Some(port) = url.port_or_known_default() {
            requirements.push(DomainRequirement::HostnamePort {
                hostname: host.to_string(),
                port,
            });
        }
    }
    requirements.push(DomainRequirement::Path(url.path().to_string()));
    requirements
}

/// The set of URLs a group of stored credentials applies to.
///
/// Every empty list leaves that aspect unconstrained, so the default domain matches everything.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialDomain {
    pub schemes: Vec<String>,
    /// Host names, with a leading `*.` matching any subdomain.
    pub hostnames: Vec<String>,
    pub ports: Vec<u16>,
    pub path_prefixes: Vec<String>,
}

impl CredentialDomain {
    pub fn matches(&self, requirements: &[DomainRequirement]) -> bool {
        requirements.iter().all(|requirement| self.test(requirement))
    }

    fn test(&self, requirement: &DomainRequirement) -> bool {
        match requirement {
            DomainRequirement::Scheme(scheme) => {
                self.schemes.is_empty()
                    || self.schemes.iter().any(|s| s.eq_ignore_ascii_case(scheme))
            }
            DomainRequirement::Hostname(hostname) => {
                self.hostnames.is_empty()
                    || self
                        .hostnames
                        .iter()
                        .any(|pattern| hostname_matches(pattern, hostname))
            }
            DomainRequirement::HostnamePort { port, .. } => {
                self.ports.is_empty() || self.ports.contains(port)
            }
            DomainRequirement::Path(path) => {
                self.path_prefixes.is_empty()
                    || self
                        .path_prefixes
                        .iter()
                        .any(|prefix| path.starts_with(prefix.as_str()))
            }
        }
    }
}

fn hostname_matches(pattern: &str, hostname: &str) -> bool {
    let hostname = hostname.to_ascii_lowercase();
    let pattern = pattern.to_ascii_lowercase();
    match pattern.strip_prefix("*.") {
        Some(parent) => hostname
            .strip_suffix(parent)
            .is_some_and(|sub| sub.ends_with('.') && sub.len() > 1),
        None => hostname == pattern,
    }
}
