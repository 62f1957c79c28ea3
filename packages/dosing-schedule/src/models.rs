//! Modelos de dados das prescrições usados no aprazamento
//!
//! Este módulo define de onde vem o instante de início de cada tipo de
//! prescrição e o item que carrega o aprazamento gravado.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schedule::{DosingSchedule, DosingScheduleCalculator};

/// Tipo de prescrição
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrescriptionKind {
    /// Prescrição médica
    Medical,
    /// Prescrição de enfermagem
    Nursing,
}

impl std::fmt::Display for PrescriptionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrescriptionKind::Medical => write!(f, "medical"),
            PrescriptionKind::Nursing => write!(f, "nursing"),
        }
    }
}

/// Datas da prescrição relevantes para o aprazamento
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrescriptionTiming {
    /// Identificador da prescrição
    pub prescription_id: Uuid,
    /// Tipo de prescrição
    pub kind: PrescriptionKind,
    /// Data e hora de início informada na prescrição
    pub start_at: Option<DateTime<Utc>>,
    /// Data e hora de criação do registro
    pub created_at: DateTime<Utc>,
}

impl PrescriptionTiming {
    /// Instante a partir do qual os horários são calculados.
    ///
    /// Prescrições de enfermagem sem início usam a data de criação.
    pub fn start_instant(&self) -> Option<DateTime<Utc>> {
        match self.kind {
            PrescriptionKind::Medical => self.start_at,
            PrescriptionKind::Nursing => self.start_at.or(Some(self.created_at)),
        }
    }
}

/// Item de prescrição com o aprazamento já calculado
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrescriptionItem {
    /// Identificador único do item
    pub id: Uuid,
    /// Prescrição à qual o item pertence
    pub prescription_id: Uuid,
    /// Medicamento ou cuidado prescrito
    pub medication: String,
    /// Frequência como digitada na prescrição
    pub frequency_label: String,
    /// Horários de administração (ISO-8601 em UTC)
    #[serde(default)]
    pub schedule: DosingSchedule,
}

impl PrescriptionItem {
    /// Cria um item e calcula seu aprazamento.
    ///
    /// Sem instante de início o aprazamento fica vazio.
    pub fn new(
        calculator: &DosingScheduleCalculator,
        timing: &PrescriptionTiming,
        medication: impl Into<String>,
        frequency_label: impl Into<String>,
    ) -> Self {
        let mut item = Self {
            id: Uuid::new_v4(),
            prescription_id: timing.prescription_id,
            medication: medication.into(),
            frequency_label: frequency_label.into(),
            schedule: DosingSchedule::default(),
        };
        item.schedule = item.compute(calculator, timing);
        item
    }

    /// Troca a frequência e recalcula todo o aprazamento
    pub fn reschedule(
        &mut self,
        calculator: &DosingScheduleCalculator,
        timing: &PrescriptionTiming,
        frequency_label: impl Into<String>,
    ) {
        self.frequency_label = frequency_label.into();
        self.schedule = self.compute(calculator, timing);
    }

    fn compute(&self, calculator: &DosingScheduleCalculator, timing: &PrescriptionTiming) -> DosingSchedule {
        match timing.start_instant() {
            Some(start) => calculator.compute_schedule(start, &self.frequency_label),
            None => DosingSchedule::default(),
        }
    }
}
