use serde::{Deserialize, Serialize};
use std::fmt;

/// Provider match states, as reported in the `status` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProviderStatus {
    Scheduled,
    Timed,
    InPlay,
    Paused,
    ExtraTime,
    PenaltyShootout,
    Finished,
    Suspended,
    Postponed,
    Cancelled,
    Awarded,
}

impl ProviderStatus {
    /// Parse a raw provider string. Unknown values fall back to `Scheduled`
    /// so an unexpected state never locks a fixture.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "SCHEDULED" => ProviderStatus::Scheduled,
            "TIMED" => ProviderStatus::Timed,
            "IN_PLAY" | "LIVE" => ProviderStatus::InPlay,
            "PAUSED" => ProviderStatus::Paused,
            "EXTRA_TIME" => ProviderStatus::ExtraTime,
            "PENALTY_SHOOTOUT" | "PENALTIES" => ProviderStatus::PenaltyShootout,
            "FINISHED" => ProviderStatus::Finished,
            "SUSPENDED" => ProviderStatus::Suspended,
            "POSTPONED" => ProviderStatus::Postponed,
            "CANCELLED" | "CANCELED" => ProviderStatus::Cancelled,
            "AWARDED" => ProviderStatus::Awarded,
            other => {
                tracing::debug!(status = other, "Unrecognized provider status, treating as scheduled");
                ProviderStatus::Scheduled
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderStatus::Scheduled => "SCHEDULED",
            ProviderStatus::Timed => "TIMED",
            ProviderStatus::InPlay => "IN_PLAY",
            ProviderStatus::Paused => "PAUSED",
            ProviderStatus::ExtraTime => "EXTRA_TIME",
            ProviderStatus::PenaltyShootout => "PENALTY_SHOOTOUT",
            ProviderStatus::Finished => "FINISHED",
            ProviderStatus::Suspended => "SUSPENDED",
            ProviderStatus::Postponed => "POSTPONED",
            ProviderStatus::Cancelled => "CANCELLED",
            ProviderStatus::Awarded => "AWARDED",
        }
    }

    pub fn detail(&self) -> StatusDetail {
        let (localized, description) = match self {
            ProviderStatus::Scheduled => ("agendado", "Partida agendada"),
            ProviderStatus::Timed => ("confirmado", "Horário confirmado"),
            ProviderStatus::InPlay => ("ao_vivo", "Partida em andamento"),
            ProviderStatus::Paused => ("intervalo", "Partida no intervalo"),
            ProviderStatus::ExtraTime => ("prorrogacao", "Partida na prorrogação"),
            ProviderStatus::PenaltyShootout => ("penaltis", "Disputa de pênaltis"),
            ProviderStatus::Finished => ("finalizado", "Partida encerrada"),
            ProviderStatus::Suspended => ("suspenso", "Partida suspensa"),
            ProviderStatus::Postponed => ("adiado", "Partida adiada"),
            ProviderStatus::Cancelled => ("cancelado", "Partida cancelada"),
            ProviderStatus::Awarded => ("wo", "Resultado decidido administrativamente"),
        };

        StatusDetail {
            localized_status: localized,
            description,
            accepts_predictions: matches!(self, ProviderStatus::Scheduled | ProviderStatus::Timed),
            is_finished: matches!(
                self,
                ProviderStatus::Finished | ProviderStatus::Cancelled | ProviderStatus::Awarded
            ),
        }
    }
}

impl fmt::Display for ProviderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived view of a provider status. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusDetail {
    pub localized_status: &'static str,
    pub description: &'static str,
    pub accepts_predictions: bool,
    pub is_finished: bool,
}

/// Translate a raw provider status string into its internal detail.
pub fn translate(raw: &str) -> StatusDetail {
    ProviderStatus::parse(raw).detail()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
