//! Horários igualmente espaçados entre dois horários do dia
//!
//! Usado na tela de aprazamento manual: dados início, fim e quantidade de
//! repetições, distribui os horários pela janela. Quando o fim é anterior ou
//! igual ao início, a janela atravessa a meia-noite.

use chrono::{Duration, NaiveTime, Timelike};
use tracing::debug;

use crate::error::ScheduleError;

const MINUTES_PER_DAY: f64 = 1440.0;

/// Quantidade máxima de horários: um por minuto do dia
pub const MAX_SLOTS: u32 = 1440;

/// Calculadora de horários igualmente espaçados
#[derive(Debug, Clone, Copy, Default)]
pub struct EqualIntervalSlotCalculator;

impl EqualIntervalSlotCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Distribui `count` horários entre `start` e `end`.
    ///
    /// O passo é `janela / count` sem truncamento; cada horário é arredondado
    /// para o minuto mais próximo. Retorna exatamente `count` horários;
    /// `count` zero ou acima de [`MAX_SLOTS`] resulta em lista vazia.
    pub fn compute_slots(&self, start: NaiveTime, end: NaiveTime, count: u32) -> Vec<NaiveTime> {
        if count == 0 || count > MAX_SLOTS {
            debug!("Quantidade de horários fora do limite (1 a {}): {}", MAX_SLOTS, count);
            return Vec::new();
        }

        let start_minutes = minutes_since_midnight(start);
        let end_minutes = minutes_since_midnight(end);

        let span = if end_minutes > start_minutes {
            end_minutes - start_minutes
        } else {
            (MINUTES_PER_DAY - start_minutes) + end_minutes
        };
        let step = span / f64::from(count);

        (0..count)
            .map(|i| {
                let slot = (start_minutes + step * f64::from(i)) % MINUTES_PER_DAY;
                let minutes = (slot.round() as i64) % 1440;
                NaiveTime::MIN + Duration::minutes(minutes)
            })
            .collect()
    }

    /// Versão em texto (`HH:mm`) usada pelos formulários.
    ///
    /// Horários vazios ou inválidos e quantidade menor ou igual a zero ou
    /// acima de [`MAX_SLOTS`] resultam em lista vazia.
    pub fn compute_slots_from_str(&self, start: &str, end: &str, count: i64) -> Vec<String> {
        let Ok(count) = u32::try_from(count) else {
            return Vec::new();
        };

        let (start, end) = match (parse_clock(start), parse_clock(end)) {
            (Ok(start), Ok(end)) => (start, end),
            (Err(e), _) | (_, Err(e)) => {
                debug!("Horários não calculados: {}", e);
                return Vec::new();
            }
        };

        self.compute_slots(start, end, count)
            .into_iter()
            .map(|t| t.format("%H:%M").to_string())
            .collect()
    }
}

/// Interpreta um horário `HH:mm` (segundos opcionais)
pub fn parse_clock(raw: &str) -> Result<NaiveTime, ScheduleError> {
    let trimmed = raw.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|_| ScheduleError::InvalidClockTime(trimmed.to_string()))
}

fn minutes_since_midnight(time: NaiveTime) -> f64 {
    f64::from(time.hour() * 60 + time.minute())
}
