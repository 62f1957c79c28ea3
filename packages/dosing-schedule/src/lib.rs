//! Dosing Schedule - Biblioteca compartilhada para cálculo de aprazamento
//!
//! Esta biblioteca fornece:
//! - Cálculo dos horários de administração a partir da frequência prescrita
//! - Cálculo de horários igualmente espaçados entre dois horários do dia
//! - Modelos usados pelas prescrições médicas e de enfermagem
//!
//! Os cálculos são funções puras: nenhum deles consulta o relógio do sistema.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::info;

pub mod error;
pub mod frequency;
pub mod models;
pub mod schedule;
pub mod slots;

pub use error::ScheduleError;
pub use frequency::{interval_hours_for_label, Frequency};
pub use models::{PrescriptionItem, PrescriptionKind, PrescriptionTiming};
pub use schedule::{DosingSchedule, DosingScheduleCalculator};
pub use slots::EqualIntervalSlotCalculator;

/// Variável de ambiente com o fuso horário do hospital
pub const ENV_TIMEZONE: &str = "APRAZAMENTO_TIMEZONE";
/// Variável de ambiente com a hora limite do aprazamento no dia seguinte
pub const ENV_CUTOFF_HOUR: &str = "APRAZAMENTO_CUTOFF_HOUR";

/// Configuração do cálculo de aprazamento
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Fuso horário usado para arredondar horários e calcular o limite
    pub timezone: Tz,
    /// Hora do dia seguinte ao início em que o aprazamento termina
    pub cutoff_hour: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::America::Sao_Paulo,
            cutoff_hour: 10,
        }
    }
}

impl SchedulerConfig {
    /// Carrega a configuração das variáveis de ambiente, usando os valores
    /// padrão para as que não estiverem definidas
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Carrega a configuração a partir de uma função de consulta de variáveis
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(name) = lookup(ENV_TIMEZONE).filter(|v| !v.trim().is_empty()) {
            config.timezone = name.trim().parse::<Tz>().map_err(|e| {
                ScheduleError::InvalidConfiguration(format!("fuso horário '{}': {}", name, e))
            })?;
        }

        if let Some(hour) = lookup(ENV_CUTOFF_HOUR).filter(|v| !v.trim().is_empty()) {
            config.cutoff_hour = hour.trim().parse::<u32>().map_err(|e| {
                ScheduleError::InvalidConfiguration(format!("hora limite '{}': {}", hour, e))
            })?;
        }

        config.validate().context("Falha ao carregar configuração do aprazamento")?;

        info!(
            "Aprazamento configurado: fuso {}, limite às {}h",
            config.timezone, config.cutoff_hour
        );
        Ok(config)
    }

    /// Verifica se os valores estão dentro dos limites aceitos
    pub fn validate(&self) -> std::result::Result<(), ScheduleError> {
        if self.cutoff_hour > 23 {
            return Err(ScheduleError::InvalidConfiguration(format!(
                "hora limite deve estar entre 0 e 23, recebeu {}",
                self.cutoff_hour
            )));
        }
        Ok(())
    }

    /// Converte um horário local (sem fuso) em instante UTC.
    ///
    /// Horários ambíguos usam a primeira ocorrência; horários inexistentes
    /// (início do horário de verão) avançam uma hora.
    pub fn local_to_utc(&self, naive: NaiveDateTime) -> DateTime<Utc> {
        let tz = self.timezone;
        tz.from_local_datetime(&naive)
            .earliest()
            .or_else(|| {
                naive
                    .checked_add_signed(Duration::hours(1))
                    .and_then(|later| tz.from_local_datetime(&later).earliest())
            })
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| Utc.from_utc_datetime(&naive))
    }
}
