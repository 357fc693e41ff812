use serde::{Deserialize, Serialize};

/// Read state of a document. The original wire value for the unread state
/// contains a space ("non letto").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum StatoLettura {
    #[serde(rename = "letto")]
    Letto,
    #[default]
    #[serde(rename = "non letto")]
    NonLetto,
}

impl StatoLettura {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatoLettura::Letto => "letto",
            StatoLettura::NonLetto => "non letto",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "letto" => Some(StatoLettura::Letto),
            "non letto" => Some(StatoLettura::NonLetto),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tipologia {
    pub id: i64,
    pub nome: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTipologia {
    pub nome: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Documento {
    pub id: i64,
    pub user_id: i64,
    pub tipologia_id: i64,
    pub nome: String,
    pub url: String,
    #[serde(rename = "stato_lettura")]
    pub stato_lettura: StatoLettura,
    pub created_at: String,
    pub updated_at: String,
}

/// Owner projection attached to document responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentoOwner {
    pub id: i64,
    pub nome: String,
    pub email: String,
}

/// Document decorated with its tipologia and (optionally) its owner.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentoDetail {
    #[serde(flatten)]
    pub documento: Documento,
    pub tipologia: Tipologia,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<DocumentoOwner>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDocumento {
    pub user_id: i64,
    pub tipologia_id: i64,
    pub nome: String,
    pub url: String,
}
