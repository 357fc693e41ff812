use serde::{Deserialize, Serialize};

/// Employee record. `skills` is stored as a JSON array in SQLite, matching
/// how the planner filters candidate employees for a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dipendente {
    pub id: i64,
    pub nome: String,
    pub cognome: String,
    pub email: String,
    pub telefono: Option<String>,
    pub user_id: Option<i64>,
    pub ruolo: String,
    pub skills: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Payload for creating an employee.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDipendente {
    pub nome: String,
    pub cognome: String,
    pub email: String,
    #[serde(default)]
    pub telefono: Option<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default = "default_ruolo")]
    pub ruolo: String,
    #[serde(default)]
    pub skills: Vec<String>,
}

fn default_ruolo() -> String {
    "Altro".to_string()
}

/// Job function (macro-activity) a task requires.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Funzione {
    pub id: i64,
    pub nome: String,
    pub descrizione: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: i64,
    pub nome: String,
    pub created_at: String,
    pub updated_at: String,
}
