use serde::{Deserialize, Serialize};

/// Clock punch kind. The mobile client sends these verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PunchType {
    Start,
    BreakStart,
    BreakEnd,
    End,
}

impl PunchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PunchType::Start => "start",
            PunchType::BreakStart => "break_start",
            PunchType::BreakEnd => "break_end",
            PunchType::End => "end",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "start" => Some(PunchType::Start),
            "break_start" => Some(PunchType::BreakStart),
            "break_end" => Some(PunchType::BreakEnd),
            "end" => Some(PunchType::End),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestType {
    Ferie,
    Permesso,
    Sts,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::Ferie => "ferie",
            RequestType::Permesso => "permesso",
            RequestType::Sts => "sts",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ferie" => Some(RequestType::Ferie),
            "permesso" => Some(RequestType::Permesso),
            "sts" => Some(RequestType::Sts),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(RequestStatus::Pending),
            "approved" => Some(RequestStatus::Approved),
            "rejected" => Some(RequestStatus::Rejected),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub id: i64,
    pub user_id: i64,
    pub start_time: String,
    pub end_time: String,
    pub date: String,
    pub role: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub commessa_id: Option<i64>,
    pub task_id: Option<i64>,
    pub resource_id: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// User projection attached to shift responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftUser {
    pub id: i64,
    pub nome: String,
    pub email: String,
    pub role: String,
}

/// Commessa projection attached to shift responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftCommessa {
    pub id: i64,
    pub codice: String,
    pub descrizione: String,
    pub cliente: String,
    pub stato: String,
}

/// Task projection attached to shift responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftTask {
    pub id: i64,
    pub nome: String,
    pub descrizione: Option<String>,
    pub stato: String,
    pub durata_prevista: Option<f64>,
    pub numero_risorse: i64,
    pub skills: Option<Vec<String>>,
}

/// Shift decorated with its user, commessa and task.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftDetail {
    #[serde(flatten)]
    pub shift: Shift,
    pub user: ShiftUser,
    pub commessa: Option<ShiftCommessa>,
    pub task: Option<ShiftTask>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewShift {
    pub user_id: i64,
    /// Calendar resource lane; falls back to `user_id` when absent.
    #[serde(default)]
    pub resource_id: Option<i64>,
    pub start_time: String,
    pub end_time: String,
    pub date: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub commessa_id: Option<i64>,
    #[serde(default)]
    pub task_id: Option<i64>,
}

/// Partial update — absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateShift {
    pub user_id: Option<i64>,
    pub resource_id: Option<i64>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub date: Option<String>,
    pub role: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub commessa_id: Option<i64>,
    pub task_id: Option<i64>,
}

/// Query filters on the shift listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftFilter {
    pub user_id: Option<i64>,
    pub date: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub commessa_id: Option<i64>,
    pub task_id: Option<i64>,
}

/// One bucket of the dashboard's "today by commessa" view. Shifts with no
/// commessa collect under a placeholder bucket.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommessaShiftGroup {
    pub commessa: GroupCommessa,
    pub turni: Vec<GroupTurno>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupCommessa {
    pub id: Option<i64>,
    pub codice: String,
    pub descrizione: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupTurno {
    pub id: i64,
    pub user: ShiftUser,
    pub start_time: String,
    pub end_time: String,
    pub role: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timbratura {
    pub id: i64,
    pub user_id: i64,
    #[serde(rename = "type")]
    pub punch_type: PunchType,
    pub timestamp: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub synced_from_offline: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTimbratura {
    #[serde(rename = "type")]
    pub punch_type: PunchType,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

/// An entry from the client's offline punch queue. Everything is optional:
/// a malformed entry must yield a per-entry error, not a rejected batch.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingEntry {
    /// Client-side queue id, echoed back untouched.
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(rename = "type", default)]
    pub punch_type: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResult {
    pub id: Option<serde_json::Value>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub id: i64,
    pub user_id: i64,
    #[serde(rename = "type")]
    pub request_type: RequestType,
    pub start_date: String,
    pub end_date: String,
    pub note: Option<String>,
    pub status: RequestStatus,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRequest {
    #[serde(rename = "type")]
    pub request_type: RequestType,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub note: Option<String>,
}
