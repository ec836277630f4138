//! Agent configuration

use std::time::Duration;

/// Configuration for the appointment agent server
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub name: String,
    /// Route prefix the SWAIG endpoint is mounted under (e.g. `/agent`)
    pub route: String,
    pub port: u16,
    /// Number confirmation texts are sent from
    pub sms_from: String,
    /// Transfer target for escalations
    pub supervisor_number: String,
    /// Run returned actions in-process instead of only returning them
    pub execute_actions: bool,
    /// Carrier webhook used when executing actions in-process
    pub carrier_webhook: Option<String>,
    /// How long ended calls are remembered before being dropped
    pub ended_retention: Duration,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: "appointment-agent".to_string(),
            route: "/agent".to_string(),
            port: 3000,
            sms_from: "+15559999999".to_string(),
            supervisor_number: "+15551234567".to_string(),
            execute_actions: false,
            carrier_webhook: None,
            ended_retention: Duration::from_secs(300),
        }
    }
}

impl AgentConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            name: std::env::var("SWAIG_AGENT_NAME").unwrap_or(defaults.name),
            route: std::env::var("SWAIG_ROUTE")
                .map(|r| normalize_route(&r))
                .unwrap_or(defaults.route),
            port: std::env::var("SWAIG_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            sms_from: std::env::var("SWAIG_SMS_FROM").unwrap_or(defaults.sms_from),
            supervisor_number: std::env::var("SWAIG_SUPERVISOR_NUMBER")
                .unwrap_or(defaults.supervisor_number),
            execute_actions: std::env::var("SWAIG_EXECUTE_ACTIONS")
                .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
                .unwrap_or(defaults.execute_actions),
            carrier_webhook: std::env::var("SWAIG_CARRIER_WEBHOOK")
                .ok()
                .filter(|u| !u.is_empty()),
            ended_retention: std::env::var("SWAIG_ENDED_RETENTION_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map_or(defaults.ended_retention, Duration::from_secs),
        }
    }
}

/// Leading slash, no trailing slash; the root route becomes empty
fn normalize_route(route: &str) -> String {
    let trimmed = route.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_route() {
        assert_eq!(normalize_route("agent"), "/agent");
        assert_eq!(normalize_route("/agent/"), "/agent");
        assert_eq!(normalize_route("/"), "");
        assert_eq!(normalize_route(" /a/b "), "/a/b");
    }

    #[test]
    fn test_defaults() {
        let config = AgentConfig::default();
        assert_eq!(config.name, "appointment-agent");
        assert_eq!(config.sms_from, "+15559999999");
        assert_eq!(config.supervisor_number, "+15551234567");
        assert!(!config.execute_actions);
        assert_eq!(config.ended_retention, Duration::from_secs(300));
    }
}
