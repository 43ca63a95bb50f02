//! Enrollment credentials sourced from the environment.

use secrecy::Secret;

use crate::error::ConfigError;

/// Environment variable holding the university NetID.
pub const NET_ID_VAR: &str = "NET_ID";
/// Environment variable holding the account password.
pub const PASSWORD_VAR: &str = "PASSWORD";

/// Login credentials for the enrollment site.
///
/// The password is wrapped in [`Secret`] so it is redacted from debug output
/// and never lands in a log field by accident.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub net_id: String,
    pub password: Secret<String>,
}

impl Credentials {
    /// Read credentials from the process environment.
    ///
    /// Called before any browser work so a misconfigured run fails without
    /// ever navigating.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read credentials through a custom lookup.
    ///
    /// The separate signature keeps tests free of process-environment
    /// mutation.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let net_id = present(lookup(NET_ID_VAR)).ok_or(ConfigError::MissingNetId)?;
        let password = present(lookup(PASSWORD_VAR)).ok_or(ConfigError::MissingPassword)?;
        Ok(Self {
            net_id,
            password: Secret::new(password),
        })
    }
}

/// Treat an unset or empty variable the same way: as absent.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    fn lookup_from<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            pairs
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| (*v).to_string())
        }
    }

    #[test]
    fn loads_both_variables() {
        let creds =
            Credentials::from_lookup(lookup_from(&[("NET_ID", "bbadger"), ("PASSWORD", "hunter2")]))
                .unwrap();
        assert_eq!(creds.net_id, "bbadger");
        assert_eq!(creds.password.expose_secret(), "hunter2");
    }

    #[test]
    fn missing_net_id_is_rejected() {
        let err = Credentials::from_lookup(lookup_from(&[("PASSWORD", "hunter2")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingNetId));
    }

    #[test]
    fn missing_password_is_rejected() {
        let err = Credentials::from_lookup(lookup_from(&[("NET_ID", "bbadger")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingPassword));
    }

    #[test]
    fn empty_values_count_as_missing() {
        let err = Credentials::from_lookup(lookup_from(&[("NET_ID", ""), ("PASSWORD", "hunter2")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingNetId));

        let err = Credentials::from_lookup(lookup_from(&[("NET_ID", "bbadger"), ("PASSWORD", "")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingPassword));
    }

    #[test]
    fn debug_output_redacts_the_password() {
        let creds =
            Credentials::from_lookup(lookup_from(&[("NET_ID", "bbadger"), ("PASSWORD", "hunter2")]))
                .unwrap();
        let debug = format!("{creds:?}");
        assert!(!debug.contains("hunter2"));
    }
}
