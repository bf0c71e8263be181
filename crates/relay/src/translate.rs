//! Renders an Alertmanager alert group as a single Apprise message.

use std::collections::BTreeMap;

use crate::alertmanager::{Alert, AlertGroupNotification, AlertStatus};
use crate::apprise::{MessageFormat, MessageType, OutboundMessage};

const FIRING_MARKER: &str = "🔴";
const RESOLVED_MARKER: &str = "✅";

fn marker(status: &AlertStatus) -> &'static str {
    match status {
        AlertStatus::Firing => FIRING_MARKER,
        _ => RESOLVED_MARKER,
    }
}

/// Alerts partitioned by status. Status order is firing, resolved, then any
/// other status by name; alerts keep their original order within a group.
pub fn group_by_status(alerts: &[Alert]) -> BTreeMap<AlertStatus, Vec<&Alert>> {
    let mut groups: BTreeMap<AlertStatus, Vec<&Alert>> = BTreeMap::new();
    for alert in alerts {
        groups.entry(alert.status.clone()).or_default().push(alert);
    }
    groups
}

/// Build the message body: one block per status present.
pub fn render_body(notification: &AlertGroupNotification) -> String {
    let mut body = String::new();

    for (status, alerts) in group_by_status(&notification.alerts) {
        body.push_str(&format!(
            "{} [{}:{}] {} \n\t\tSummary: {} \n\t\tURL:  {} \n",
            marker(&status),
            status.as_str().to_uppercase(),
            alerts.len(),
            notification.common_labels.alertname,
            notification.common_annotations.summary,
            notification.external_url,
        ));
    }

    body
}

pub fn translate(notification: &AlertGroupNotification, tag: &str) -> OutboundMessage {
    OutboundMessage {
        title: None,
        body: render_body(notification),
        message_type: MessageType::Info,
        tag: tag.to_string(),
        format: MessageFormat::Text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alertmanager::{CommonAnnotations, GroupLabels};

    fn alert(status: AlertStatus, fingerprint: &str) -> Alert {
        Alert {
            status,
            labels: [("alertname".to_string(), "DiskFull".to_string())].into(),
            fingerprint: fingerprint.to_string(),
            ..Default::default()
        }
    }

    fn notification(alerts: Vec<Alert>) -> AlertGroupNotification {
        AlertGroupNotification {
            common_labels: GroupLabels {
                alertname: "DiskFull".to_string(),
            },
            common_annotations: CommonAnnotations {
                summary: "Disk usage above 90%".to_string(),
            },
            external_url: "http://am.example.com".to_string(),
            alerts,
            ..Default::default()
        }
    }

    #[test]
    fn test_single_firing_alert() {
        let msg = translate(&notification(vec![alert(AlertStatus::Firing, "a")]), "ops");

        assert_eq!(
            msg.body,
            "🔴 [FIRING:1] DiskFull \n\t\tSummary: Disk usage above 90% \n\t\tURL:  http://am.example.com \n"
        );
        assert_eq!(msg.message_type, MessageType::Info);
        assert_eq!(msg.format, MessageFormat::Text);
        assert_eq!(msg.tag, "ops");
        assert_eq!(msg.title, None);
    }

    #[test]
    fn test_firing_and_resolved_get_one_block_each() {
        let msg = translate(
            &notification(vec![
                alert(AlertStatus::Resolved, "b"),
                alert(AlertStatus::Firing, "a"),
            ]),
            "all",
        );

        assert_eq!(msg.body.matches(FIRING_MARKER).count(), 1);
        assert_eq!(msg.body.matches(RESOLVED_MARKER).count(), 1);
        assert_eq!(
            msg.body,
            "🔴 [FIRING:1] DiskFull \n\t\tSummary: Disk usage above 90% \n\t\tURL:  http://am.example.com \n\
             ✅ [RESOLVED:1] DiskFull \n\t\tSummary: Disk usage above 90% \n\t\tURL:  http://am.example.com \n"
        );
    }

    #[test]
    fn test_counts_match_status_sizes() {
        let msg = translate(
            &notification(vec![
                alert(AlertStatus::Firing, "a"),
                alert(AlertStatus::Resolved, "b"),
                alert(AlertStatus::Firing, "c"),
                alert(AlertStatus::Firing, "d"),
                alert(AlertStatus::Resolved, "e"),
            ]),
            "all",
        );

        assert_eq!(msg.body.matches("[FIRING:3]").count(), 1);
        assert_eq!(msg.body.matches("[RESOLVED:2]").count(), 1);
        assert_eq!(msg.body.matches("Summary:").count(), 2);
        assert_eq!(msg.body.matches("URL:").count(), 2);
    }

    #[test]
    fn test_other_statuses_get_their_own_blocks() {
        let msg = translate(
            &notification(vec![
                alert(AlertStatus::Other("suppressed".to_string()), "a"),
                alert(AlertStatus::Firing, "b"),
                alert(AlertStatus::Other("pending".to_string()), "c"),
                alert(AlertStatus::Other("pending".to_string()), "d"),
            ]),
            "all",
        );

        assert_eq!(msg.body.matches("✅ [PENDING:2] DiskFull \n").count(), 1);
        assert_eq!(msg.body.matches("✅ [SUPPRESSED:1] DiskFull \n").count(), 1);
        let firing = msg.body.find("[FIRING:1]").unwrap();
        let pending = msg.body.find("[PENDING:2]").unwrap();
        let suppressed = msg.body.find("[SUPPRESSED:1]").unwrap();
        assert!(firing < pending && pending < suppressed);
    }

    #[test]
    fn test_missing_status_renders_empty_header() {
        let msg = translate(&notification(vec![alert(AlertStatus::default(), "a")]), "all");
        assert!(msg.body.starts_with("✅ [:1] DiskFull \n"));
    }

    #[test]
    fn test_empty_alerts_still_produce_a_message() {
        let msg = translate(&notification(vec![]), "all");
        assert_eq!(msg.body, "");
        assert_eq!(msg.tag, "all");
    }

    #[test]
    fn test_grouping_preserves_alert_order() {
        let alerts = vec![
            alert(AlertStatus::Resolved, "r1"),
            alert(AlertStatus::Firing, "f1"),
            alert(AlertStatus::Resolved, "r2"),
            alert(AlertStatus::Firing, "f2"),
        ];
        let groups = group_by_status(&alerts);

        let order: Vec<AlertStatus> = groups.keys().cloned().collect();
        assert_eq!(order, vec![AlertStatus::Firing, AlertStatus::Resolved]);

        let firing: Vec<&str> = groups[&AlertStatus::Firing]
            .iter()
            .map(|a| a.fingerprint.as_str())
            .collect();
        let resolved: Vec<&str> = groups[&AlertStatus::Resolved]
            .iter()
            .map(|a| a.fingerprint.as_str())
            .collect();
        assert_eq!(firing, vec!["f1", "f2"]);
        assert_eq!(resolved, vec!["r1", "r2"]);
    }

    #[test]
    fn test_translation_is_deterministic() {
        let input = notification(vec![
            alert(AlertStatus::Resolved, "b"),
            alert(AlertStatus::Firing, "a"),
        ]);
        assert_eq!(translate(&input, "all"), translate(&input, "all"));
    }
}
