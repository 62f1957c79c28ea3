//! Cálculo de aprazamento
//!
//! A partir do instante de início da prescrição e da frequência prescrita,
//! gera os horários de administração até o limite (por padrão, 10:00 do dia
//! seguinte ao início). O primeiro horário é sempre o próprio início; os
//! seguintes caem em horas cheias e pares no fuso configurado.

use chrono::{DateTime, Days, Duration, NaiveDateTime, NaiveTime, SecondsFormat, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, trace, warn};

use crate::error::ScheduleError;
use crate::frequency::{interval_hours_for_label, Frequency};
use crate::SchedulerConfig;

/// Formatos aceitos para inícios gravados sem fuso, interpretados no fuso local
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Sequência ordenada de horários de administração
///
/// Serializada como lista de strings ISO-8601 em UTC, que é o formato
/// gravado no item da prescrição.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DosingSchedule {
    times: Vec<DateTime<Utc>>,
}

impl DosingSchedule {
    /// Horários em ordem cronológica
    pub fn times(&self) -> &[DateTime<Utc>] {
        &self.times
    }

    /// Quantidade de administrações
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Indica se não há horário calculado
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Primeira administração, igual ao início da prescrição
    pub fn first(&self) -> Option<&DateTime<Utc>> {
        self.times.first()
    }

    /// Última administração antes do limite
    pub fn last(&self) -> Option<&DateTime<Utc>> {
        self.times.last()
    }

    /// Percorre os horários em ordem
    pub fn iter(&self) -> std::slice::Iter<'_, DateTime<Utc>> {
        self.times.iter()
    }

    /// Consome o aprazamento e devolve os horários
    pub fn into_inner(self) -> Vec<DateTime<Utc>> {
        self.times
    }

    /// Horários no formato persistido (`2024-01-10T22:30:00.000Z`)
    pub fn to_iso_strings(&self) -> Vec<String> {
        self.times
            .iter()
            .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true))
            .collect()
    }

    /// Horários locais `HH:mm` separados por vírgula, ou "-" quando vazio
    pub fn display_times(&self, tz: &Tz) -> String {
        if self.times.is_empty() {
            return "-".to_string();
        }

        self.times
            .iter()
            .map(|t| t.with_timezone(tz).format("%H:%M").to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl<'a> IntoIterator for &'a DosingSchedule {
    type Item = &'a DateTime<Utc>;
    type IntoIter = std::slice::Iter<'a, DateTime<Utc>>;

    fn into_iter(self) -> Self::IntoIter {
        self.times.iter()
    }
}

impl Serialize for DosingSchedule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.to_iso_strings())
    }
}

impl<'de> Deserialize<'de> for DosingSchedule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let times = Vec::<DateTime<Utc>>::deserialize(deserializer)?;
        Ok(Self { times })
    }
}

/// Calculadora de aprazamento, compartilhada pelas prescrições médicas e de
/// enfermagem. Cada chamador decide de onde vem o instante de início.
#[derive(Debug, Clone, Default)]
pub struct DosingScheduleCalculator {
    config: SchedulerConfig,
}

impl DosingScheduleCalculator {
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Calcula o aprazamento para um texto de frequência.
    ///
    /// Frequências sem intervalo ("Se necessário", "Uso contínuo", texto
    /// vazio ou desconhecido) resultam em aprazamento vazio.
    pub fn compute_schedule(&self, start: DateTime<Utc>, frequency_label: &str) -> DosingSchedule {
        match interval_hours_for_label(frequency_label) {
            Some(hours) => self.compute_with_interval(start, hours),
            None => {
                debug!("Frequência sem intervalo definido: '{}'", frequency_label);
                DosingSchedule::default()
            }
        }
    }

    /// Calcula o aprazamento para uma frequência já validada
    pub fn compute_for(&self, start: DateTime<Utc>, frequency: Frequency) -> DosingSchedule {
        match frequency.interval_hours() {
            Some(hours) => self.compute_with_interval(start, hours),
            None => DosingSchedule::default(),
        }
    }

    /// Calcula o aprazamento com o início ainda em texto, como vem do banco.
    ///
    /// Um início inválido é registrado no log e resulta em aprazamento vazio,
    /// para não bloquear a criação da prescrição.
    pub fn compute_schedule_from_str(&self, start: &str, frequency_label: &str) -> DosingSchedule {
        match self.try_compute_schedule_from_str(start, frequency_label) {
            Ok(schedule) => schedule,
            Err(e) => {
                warn!("Aprazamento não calculado: {}", e);
                DosingSchedule::default()
            }
        }
    }

    /// Igual a [`compute_schedule_from_str`](Self::compute_schedule_from_str),
    /// mas devolve o erro de início inválido ao chamador
    pub fn try_compute_schedule_from_str(
        &self,
        start: &str,
        frequency_label: &str,
    ) -> Result<DosingSchedule, ScheduleError> {
        let Some(hours) = interval_hours_for_label(frequency_label) else {
            return Ok(DosingSchedule::default());
        };

        let start = self.parse_start_instant(start)?;
        Ok(self.compute_with_interval(start, hours))
    }

    /// Interpreta o instante de início.
    ///
    /// Aceita RFC 3339 com fuso ou `Z`; sem fuso, o horário é considerado
    /// local no fuso configurado.
    pub fn parse_start_instant(&self, raw: &str) -> Result<DateTime<Utc>, ScheduleError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ScheduleError::InvalidStartInstant("valor vazio".to_string()));
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(dt.with_timezone(&Utc));
        }

        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
            .map(|naive| self.config.local_to_utc(naive))
            .ok_or_else(|| ScheduleError::InvalidStartInstant(trimmed.to_string()))
    }

    /// Limite do aprazamento: dia seguinte ao início, na hora limite local.
    ///
    /// `None` quando o limite cai fora do intervalo de datas representável.
    pub fn cutoff_for(&self, start: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let next_day = start
            .with_timezone(&self.config.timezone)
            .date_naive()
            .checked_add_days(Days::new(1))?;
        let cutoff = next_day
            .and_time(NaiveTime::MIN)
            .checked_add_signed(Duration::hours(i64::from(self.config.cutoff_hour)))?;
        Some(self.config.local_to_utc(cutoff))
    }

    fn compute_with_interval(&self, start: DateTime<Utc>, interval_hours: u32) -> DosingSchedule {
        match self.try_compute_with_interval(start, interval_hours) {
            Some(schedule) => schedule,
            None => {
                warn!("Aprazamento não calculado: {} fora do intervalo de datas suportado", start);
                DosingSchedule::default()
            }
        }
    }

    fn try_compute_with_interval(&self, start: DateTime<Utc>, interval_hours: u32) -> Option<DosingSchedule> {
        let cutoff = self.cutoff_for(start)?;
        let step = Duration::hours(i64::from(interval_hours));

        let mut times = vec![start];
        let mut current = start;

        while current <= cutoff {
            let mut next = self.round_to_even_hour(current.checked_add_signed(step)?)?;

            // o arredondamento precisa avançar pelo menos uma hora
            if next <= current {
                debug!("Horário {} não avançou após arredondamento, somando 1h", next);
                next = current.checked_add_signed(Duration::hours(1))?;
            }

            current = next;
            if current <= cutoff {
                times.push(current);
            }
        }

        trace!("Aprazamento de {}h a partir de {}: {} horários", interval_hours, start, times.len());
        Some(DosingSchedule { times })
    }

    /// Arredonda para a próxima hora cheia e, se a hora local for ímpar,
    /// avança mais uma hora
    fn round_to_even_hour(&self, instant: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let local = instant.with_timezone(&self.config.timezone).naive_local();
        let sub_hour = Duration::minutes(i64::from(local.minute()))
            + Duration::seconds(i64::from(local.second()))
            + Duration::nanoseconds(i64::from(local.nanosecond()));
        let one_hour = Duration::hours(1);

        let mut rounded = local.checked_sub_signed(sub_hour)?;
        if sub_hour > Duration::zero() {
            rounded = rounded.checked_add_signed(one_hour)?;
        }
        if rounded.hour() % 2 == 1 {
            rounded = rounded.checked_add_signed(one_hour)?;
        }

        Some(self.config.local_to_utc(rounded))
    }
}
