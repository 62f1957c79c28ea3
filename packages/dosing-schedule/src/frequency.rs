//! Frequências de administração de medicamentos
//!
//! A frequência é capturada como um conjunto fechado de valores. Os textos
//! livres já gravados ("A cada 8 horas", "8/8h", ...) continuam aceitos por
//! [`Frequency::from_label`], que faz a busca por palavra-chave.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ScheduleError;

/// Frequência prescrita para um item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Frequency {
    /// 1 vez ao dia (24/24h)
    OnceDaily,
    /// 2 vezes ao dia (12/12h)
    TwiceDaily,
    /// 3 vezes ao dia (8/8h)
    ThreeTimesDaily,
    /// 4 vezes ao dia (6/6h)
    FourTimesDaily,
    /// 6 vezes ao dia (4/4h)
    SixTimesDaily,
    /// Se necessário, sem horário fixo
    AsNeeded,
    /// Uso contínuo, sem horário fixo
    Continuous,
}

/// Palavras-chave aceitas nos textos legados, na ordem em que são testadas
const LEGACY_KEYWORDS: &[(&[&str], Frequency)] = &[
    (&["1 vez ao dia", "24/24h"], Frequency::OnceDaily),
    (&["2 vezes ao dia", "12/12h", "a cada 12 horas"], Frequency::TwiceDaily),
    (&["3 vezes ao dia", "8/8h", "a cada 8 horas"], Frequency::ThreeTimesDaily),
    (&["4 vezes ao dia", "6/6h"], Frequency::FourTimesDaily),
    (&["6 vezes ao dia", "4/4h", "a cada 4 horas"], Frequency::SixTimesDaily),
    (&["se necessário", "se necessario"], Frequency::AsNeeded),
    (&["uso contínuo", "uso continuo"], Frequency::Continuous),
];

impl Frequency {
    pub const ALL: [Frequency; 7] = [
        Frequency::OnceDaily,
        Frequency::TwiceDaily,
        Frequency::ThreeTimesDaily,
        Frequency::FourTimesDaily,
        Frequency::SixTimesDaily,
        Frequency::AsNeeded,
        Frequency::Continuous,
    ];

    /// Intervalo entre doses em horas; `None` para frequências sem horário fixo
    pub fn interval_hours(&self) -> Option<u32> {
        match self {
            Frequency::OnceDaily => Some(24),
            Frequency::TwiceDaily => Some(12),
            Frequency::ThreeTimesDaily => Some(8),
            Frequency::FourTimesDaily => Some(6),
            Frequency::SixTimesDaily => Some(4),
            Frequency::AsNeeded | Frequency::Continuous => None,
        }
    }

    /// Texto exibido para a equipe
    pub fn label(&self) -> &'static str {
        match self {
            Frequency::OnceDaily => "1 vez ao dia",
            Frequency::TwiceDaily => "2 vezes ao dia",
            Frequency::ThreeTimesDaily => "3 vezes ao dia",
            Frequency::FourTimesDaily => "4 vezes ao dia",
            Frequency::SixTimesDaily => "6 vezes ao dia",
            Frequency::AsNeeded => "Se necessário",
            Frequency::Continuous => "Uso contínuo",
        }
    }

    /// Interpreta um texto livre de frequência.
    ///
    /// A comparação ignora maiúsculas e espaços nas pontas e procura cada
    /// palavra-chave como substring. Textos sem correspondência retornam `None`.
    pub fn from_label(label: &str) -> Option<Frequency> {
        let lower = label.trim().to_lowercase();
        if lower.is_empty() {
            return None;
        }

        LEGACY_KEYWORDS
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
            .map(|(_, frequency)| *frequency)
    }
}

/// Resolve o intervalo em horas a partir do texto da frequência
pub fn interval_hours_for_label(label: &str) -> Option<u32> {
    Frequency::from_label(label).and_then(|f| f.interval_hours())
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Frequency {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Frequency::from_label(s).ok_or_else(|| ScheduleError::UnknownFrequency(s.to_string()))
    }
}

impl TryFrom<String> for Frequency {
    type Error = ScheduleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Frequency> for String {
    fn from(frequency: Frequency) -> Self {
        frequency.label().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_labels() {
        assert_eq!(Frequency::from_label("1 vez ao dia"), Some(Frequency::OnceDaily));
        assert_eq!(Frequency::from_label("24/24h"), Some(Frequency::OnceDaily));
        assert_eq!(Frequency::from_label("A cada 12 horas"), Some(Frequency::TwiceDaily));
        assert_eq!(Frequency::from_label("12/12h"), Some(Frequency::TwiceDaily));
        assert_eq!(Frequency::from_label("A cada 8 horas"), Some(Frequency::ThreeTimesDaily));
        assert_eq!(Frequency::from_label("8/8h"), Some(Frequency::ThreeTimesDaily));
        assert_eq!(Frequency::from_label("6/6h"), Some(Frequency::FourTimesDaily));
        assert_eq!(Frequency::from_label("4 vezes ao dia"), Some(Frequency::FourTimesDaily));
        assert_eq!(Frequency::from_label("A cada 4 horas"), Some(Frequency::SixTimesDaily));
        assert_eq!(Frequency::from_label("4/4h"), Some(Frequency::SixTimesDaily));
    }

    #[test]
    fn test_case_and_whitespace_insensitive() {
        assert_eq!(Frequency::from_label("  A CADA 8 HORAS "), Some(Frequency::ThreeTimesDaily));
        assert_eq!(Frequency::from_label("SE NECESSÁRIO"), Some(Frequency::AsNeeded));
        assert_eq!(Frequency::from_label("Dipirona 8/8h VO"), Some(Frequency::ThreeTimesDaily));
    }

    #[test]
    fn test_labels_without_interval() {
        assert_eq!(interval_hours_for_label("Se necessário"), None);
        assert_eq!(interval_hours_for_label("Uso contínuo"), None);
        assert_eq!(interval_hours_for_label(""), None);
        assert_eq!(interval_hours_for_label("   "), None);
        assert_eq!(interval_hours_for_label("xyz"), None);
        // não consta na tabela de palavras-chave
        assert_eq!(interval_hours_for_label("A cada 6 horas"), None);
    }

    #[test]
    fn test_canonical_labels_round_trip() {
        for frequency in Frequency::ALL {
            assert_eq!(Frequency::from_label(frequency.label()), Some(frequency));
            assert_eq!(frequency.to_string().parse::<Frequency>(), Ok(frequency));
        }
    }

    #[test]
    fn test_from_str_unknown() {
        let result = "duas colheres".parse::<Frequency>();
        assert_eq!(result, Err(ScheduleError::UnknownFrequency("duas colheres".to_string())));
    }

    #[test]
    fn test_serde_uses_label() -> anyhow::Result<()> {
        let json = serde_json::to_string(&Frequency::SixTimesDaily)?;
        assert_eq!(json, "\"6 vezes ao dia\"");

        let parsed: Frequency = serde_json::from_str("\"a cada 8 horas\"")?;
        assert_eq!(parsed, Frequency::ThreeTimesDaily);

        assert!(serde_json::from_str::<Frequency>("\"quando lembrar\"").is_err());
        Ok(())
    }
}
