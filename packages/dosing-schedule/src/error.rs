//! Definições de erro para a biblioteca dosing-schedule
//!
//! Frequências sem intervalo não são erro: resultam em aprazamento vazio.

use thiserror::Error;

/// Erros específicos do cálculo de aprazamento
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Data de início inválida: {0}")]
    InvalidStartInstant(String),

    #[error("Horário inválido (esperado HH:mm): {0}")]
    InvalidClockTime(String),

    #[error("Frequência desconhecida: {0}")]
    UnknownFrequency(String),

    #[error("Configuração inválida: {0}")]
    InvalidConfiguration(String),
}

impl From<chrono::ParseError> for ScheduleError {
    fn from(error: chrono::ParseError) -> Self {
        ScheduleError::InvalidStartInstant(error.to_string())
    }
}
