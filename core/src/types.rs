/// Wire types shared with the lead inbox backend
///
/// Everything here is owned by the backend; the client keeps transient
/// per-view copies only, and a reload always refetches.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Clients ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientStatus {
    New,
    InProgress,
    Closed,
}

impl ClientStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientStatus::New => "new",
            ClientStatus::InProgress => "in_progress",
            ClientStatus::Closed => "closed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ClientStatus::New => "New",
            ClientStatus::InProgress => "In progress",
            ClientStatus::Closed => "Closed",
        }
    }
}

/// Originating channel of a client or message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageSource {
    Telegram,
    Whatsapp,
    Olx,
    N8n,
    #[serde(other)]
    Other,
}

impl MessageSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageSource::Telegram => "telegram",
            MessageSource::Whatsapp => "whatsapp",
            MessageSource::Olx => "olx",
            MessageSource::N8n => "n8n",
            MessageSource::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MessageSource::Telegram => "Telegram",
            MessageSource::Whatsapp => "WhatsApp",
            MessageSource::Olx => "OLX",
            MessageSource::N8n => "n8n",
            MessageSource::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub source: MessageSource,
    pub status: ClientStatus,
    #[serde(default)]
    pub listing_id: Option<String>,
    #[serde(default)]
    pub listing_title: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_message_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub messages_count: u32,
}

impl Client {
    /// Case-insensitive match against name, phone and listing title.
    /// An empty (or whitespace) query matches everything.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() {
            return true;
        }
        let needle = query.to_lowercase();
        if self.name.to_lowercase().contains(&needle) {
            return true;
        }
        if let Some(phone) = &self.phone {
            if phone.to_lowercase().contains(&needle) {
                return true;
            }
        }
        if let Some(title) = &self.listing_title {
            if title.to_lowercase().contains(&needle) {
                return true;
            }
        }
        false
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub source: MessageSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing_title: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ClientUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ClientStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing_title: Option<String>,
}

/// Dashboard tiles; all counters default to zero so a sparse backend
/// response still renders.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub new_leads: u32,
    #[serde(default)]
    pub pending_attention: u32,
    #[serde(default)]
    pub active_chats: u32,
    #[serde(default)]
    pub completed_sales: u32,
}

// ─── Messages ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    Incoming,
    Outgoing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub client_id: String,
    pub content: String,
    pub message_type: MessageType,
    pub source: MessageSource,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub is_read: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageCreate {
    pub client_id: String,
    pub content: String,
    pub message_type: MessageType,
    pub source: MessageSource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UnreadCount {
    pub unread_count: u64,
}

// ─── Attention triage ────────────────────────────────────────────────────────

/// Severity is a client-side presentation concern; the classification
/// itself is computed server-side and opaque to us.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttentionReason {
    HighVolume,
    LowResponse,
    NoRecentActivity,
    /// Unknown reason codes must render the generic fallback, not fail
    #[serde(other)]
    Other,
}

impl AttentionReason {
    pub fn label(&self) -> &'static str {
        match self {
            AttentionReason::HighVolume => "High message volume",
            AttentionReason::LowResponse => "Few replies sent",
            AttentionReason::NoRecentActivity => "No activity for over a day",
            AttentionReason::Other => "Needs attention",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            AttentionReason::HighVolume => Severity::High,
            AttentionReason::LowResponse => Severity::Critical,
            AttentionReason::NoRecentActivity => Severity::Info,
            AttentionReason::Other => Severity::Warning,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            AttentionReason::HighVolume => "🔥",
            AttentionReason::LowResponse => "⚠",
            AttentionReason::NoRecentActivity => "⏰",
            AttentionReason::Other => "❗",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttentionListing {
    pub listing_id: String,
    #[serde(default)]
    pub listing_title: Option<String>,
    pub reason: AttentionReason,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub incoming_count: Option<u32>,
    #[serde(default)]
    pub outgoing_count: Option<u32>,
    #[serde(default)]
    pub client_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttentionSummary {
    #[serde(default)]
    pub total_listings: u32,
    #[serde(default)]
    pub reasons: std::collections::HashMap<String, u32>,
    #[serde(default)]
    pub top_listing: Option<AttentionListing>,
}

// ─── Automations ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutomationTrigger {
    NewMessage,
    NoResponse,
    TimeBased,
    Manual,
    #[serde(other)]
    Other,
}

impl AutomationTrigger {
    pub fn label(&self) -> &'static str {
        match self {
            AutomationTrigger::NewMessage => "New message",
            AutomationTrigger::NoResponse => "No response",
            AutomationTrigger::TimeBased => "Time based",
            AutomationTrigger::Manual => "Manual",
            AutomationTrigger::Other => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutomationStatus {
    Active,
    Paused,
    Inactive,
}

impl AutomationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            AutomationStatus::Active => "Active",
            AutomationStatus::Paused => "Paused",
            AutomationStatus::Inactive => "Inactive",
        }
    }

    /// Active ⇄ paused; inactive rules activate
    pub fn toggled(&self) -> AutomationStatus {
        match self {
            AutomationStatus::Active => AutomationStatus::Paused,
            AutomationStatus::Paused | AutomationStatus::Inactive => AutomationStatus::Active,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Automation {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub trigger: AutomationTrigger,
    pub status: AutomationStatus,
    /// Opaque to this client; the workflow engine interprets these
    #[serde(default)]
    pub conditions: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub actions: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomationTemplate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub trigger: AutomationTrigger,
    #[serde(default)]
    pub conditions: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub actions: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AutomationCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub trigger: AutomationTrigger,
    pub conditions: serde_json::Map<String, serde_json::Value>,
    pub actions: Vec<serde_json::Value>,
}

impl AutomationCreate {
    pub fn from_template(template: &AutomationTemplate) -> Self {
        Self {
            name: template.name.clone(),
            description: template.description.clone(),
            trigger: template.trigger,
            conditions: template.conditions.clone(),
            actions: template.actions.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AutomationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AutomationStatus>,
}

// ─── Integrations ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationStatus {
    Active,
    Inactive,
    Error,
}

impl IntegrationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            IntegrationStatus::Active => "Active",
            IntegrationStatus::Inactive => "Inactive",
            IntegrationStatus::Error => "Error",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Integration {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: MessageSource,
    pub status: IntegrationStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct IntegrationCreate {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: MessageSource,
    pub config: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct IntegrationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<IntegrationStatus>,
}

// ─── AI assistant ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct AiResponse {
    pub response: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub auto_suggest: bool,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub response_tone: Option<String>,
    #[serde(default)]
    pub api_key_configured: bool,
}

// ─── Generic acknowledgments ─────────────────────────────────────────────────

/// Action endpoints answer with a human-readable message
#[derive(Debug, Clone, Deserialize)]
pub struct Ack {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallAck {
    pub message: String,
    #[serde(default)]
    pub phone: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(name: &str, phone: Option<&str>, listing: Option<&str>) -> Client {
        Client {
            id: "c1".to_string(),
            name: name.to_string(),
            phone: phone.map(|s| s.to_string()),
            source: MessageSource::Telegram,
            status: ClientStatus::New,
            listing_id: None,
            listing_title: listing.map(|s| s.to_string()),
            created_at: None,
            updated_at: None,
            last_message_at: None,
            messages_count: 0,
        }
    }

    #[test]
    fn test_client_match_is_case_insensitive() {
        let c = client("Maria Ivanova", Some("+48 600 100 200"), Some("2-room flat"));
        assert!(c.matches("maria"));
        assert!(c.matches("IVANOVA"));
        assert!(c.matches("600 100"));
        assert!(c.matches("Flat"));
        assert!(!c.matches("bicycle"));
    }

    #[test]
    fn test_client_match_empty_query_matches_all() {
        let c = client("Maria", None, None);
        assert!(c.matches(""));
        assert!(c.matches("   "));
    }

    #[test]
    fn test_attention_reason_mapping() {
        assert_eq!(AttentionReason::HighVolume.severity(), Severity::High);
        assert_eq!(AttentionReason::HighVolume.label(), "High message volume");
        assert_eq!(AttentionReason::Other.label(), "Needs attention");
        assert_eq!(AttentionReason::Other.severity(), Severity::Warning);
    }

    #[test]
    fn test_unknown_attention_reason_falls_back() {
        // Backend may grow reason codes we do not know yet
        let json = r#"{"listing_id":"l1","listing_title":"Bike","reason":"spam_surge","details":"x"}"#;
        let listing: AttentionListing = serde_json::from_str(json).unwrap();
        assert_eq!(listing.reason, AttentionReason::Other);
        assert_eq!(listing.reason.label(), "Needs attention");
    }

    #[test]
    fn test_automation_status_toggle() {
        assert_eq!(AutomationStatus::Active.toggled(), AutomationStatus::Paused);
        assert_eq!(AutomationStatus::Paused.toggled(), AutomationStatus::Active);
        assert_eq!(AutomationStatus::Inactive.toggled(), AutomationStatus::Active);
    }

    #[test]
    fn test_enum_wire_format() {
        assert_eq!(serde_json::to_string(&ClientStatus::InProgress).unwrap(), "\"in_progress\"");
        let src: MessageSource = serde_json::from_str("\"viber\"").unwrap();
        assert_eq!(src, MessageSource::Other);
    }
}
