use serde::{Deserialize, Serialize};

/// Lifecycle of a commessa (work order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CommessaStato {
    #[default]
    Attiva,
    Completata,
    Sospesa,
    Annullata,
}

impl CommessaStato {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommessaStato::Attiva => "attiva",
            CommessaStato::Completata => "completata",
            CommessaStato::Sospesa => "sospesa",
            CommessaStato::Annullata => "annullata",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "attiva" => Some(CommessaStato::Attiva),
            "completata" => Some(CommessaStato::Completata),
            "sospesa" => Some(CommessaStato::Sospesa),
            "annullata" => Some(CommessaStato::Annullata),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskStato {
    #[default]
    Attivo,
    Completato,
    Annullato,
}

impl TaskStato {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStato::Attivo => "attivo",
            TaskStato::Completato => "completato",
            TaskStato::Annullato => "annullato",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "attivo" => Some(TaskStato::Attivo),
            "completato" => Some(TaskStato::Completato),
            "annullato" => Some(TaskStato::Annullato),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriorita {
    Bassa,
    #[default]
    Media,
    Alta,
    Urgente,
}

impl TaskPriorita {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriorita::Bassa => "bassa",
            TaskPriorita::Media => "media",
            TaskPriorita::Alta => "alta",
            TaskPriorita::Urgente => "urgente",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "bassa" => Some(TaskPriorita::Bassa),
            "media" => Some(TaskPriorita::Media),
            "alta" => Some(TaskPriorita::Alta),
            "urgente" => Some(TaskPriorita::Urgente),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commessa {
    pub id: i64,
    pub codice: String,
    pub descrizione: String,
    pub cliente: String,
    pub data_inizio: String,
    pub data_fine: Option<String>,
    pub budget: Option<f64>,
    pub stato: CommessaStato,
    pub created_at: String,
    pub updated_at: String,
}

/// Commessa with its tasks and locations attached, as the dashboard tree
/// sidebar expects. The location array keeps the original's singular alias.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommessaDetail {
    #[serde(flatten)]
    pub commessa: Commessa,
    pub tasks: Vec<Task>,
    #[serde(rename = "location")]
    pub locations: Vec<Location>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCommessa {
    pub codice: String,
    pub descrizione: String,
    pub cliente: String,
    pub data_inizio: String,
    #[serde(default)]
    pub data_fine: Option<String>,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default)]
    pub stato: CommessaStato,
}

/// Partial update — absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCommessa {
    pub codice: Option<String>,
    pub descrizione: Option<String>,
    pub cliente: Option<String>,
    pub data_inizio: Option<String>,
    pub data_fine: Option<String>,
    pub budget: Option<f64>,
    pub stato: Option<CommessaStato>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: i64,
    pub commessa_id: i64,
    pub nome: String,
    pub indirizzo: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLocation {
    pub nome: String,
    #[serde(default)]
    pub indirizzo: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLocation {
    pub nome: Option<String>,
    pub indirizzo: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub nome: String,
    pub descrizione: Option<String>,
    pub commessa_id: i64,
    pub stato: TaskStato,
    pub durata_prevista: Option<f64>,
    pub numero_risorse: i64,
    pub skills: Option<Vec<String>>,
    pub data_inizio: Option<String>,
    pub data_fine: Option<String>,
    pub location_id: Option<i64>,
    pub funzione_id: i64,
    pub priorita: TaskPriorita,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub nome: String,
    #[serde(default)]
    pub descrizione: Option<String>,
    pub commessa_id: i64,
    #[serde(default)]
    pub stato: TaskStato,
    #[serde(default)]
    pub durata_prevista: Option<f64>,
    #[serde(default = "default_numero_risorse")]
    pub numero_risorse: i64,
    #[serde(default)]
    pub skills: Option<Vec<String>>,
    #[serde(default)]
    pub data_inizio: Option<String>,
    #[serde(default)]
    pub data_fine: Option<String>,
    #[serde(default)]
    pub location_id: Option<i64>,
    pub funzione_id: i64,
    #[serde(default)]
    pub priorita: TaskPriorita,
}

fn default_numero_risorse() -> i64 {
    1
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTask {
    pub nome: Option<String>,
    pub descrizione: Option<String>,
    pub stato: Option<TaskStato>,
    pub durata_prevista: Option<f64>,
    pub numero_risorse: Option<i64>,
    pub skills: Option<Vec<String>>,
    pub data_inizio: Option<String>,
    pub data_fine: Option<String>,
    pub location_id: Option<i64>,
    pub funzione_id: Option<i64>,
    pub priorita: Option<TaskPriorita>,
}

/// A task↔dipendente assignment row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: i64,
    pub task_id: i64,
    pub dipendente_id: i64,
    pub ruolo: Option<String>,
    pub note: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAssignment {
    pub task_id: i64,
    pub dipendente_id: i64,
    #[serde(default)]
    pub ruolo: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

/// Employee projection embedded in planner responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedDipendente {
    pub id: i64,
    pub nome: String,
    pub cognome: String,
    pub email: String,
    pub ruolo: Option<String>,
}

/// Assignment decorated with its task (plus commessa) and dipendente.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentDetail {
    #[serde(flatten)]
    pub assignment: Assignment,
    pub task: Task,
    pub commessa: Commessa,
    pub dipendente: AssignedDipendente,
}

/// Filters for the resource-planner assignment listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentFilter {
    pub task_id: Option<i64>,
    pub commessa_id: Option<i64>,
    pub dipendente_id: Option<i64>,
}
