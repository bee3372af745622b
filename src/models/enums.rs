use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }

            /// Lenient parse for form input: trims and ignores ASCII case.
            pub fn parse_loose(s: &str) -> Option<Self> {
                let normalized = s.trim().to_ascii_lowercase();
                normalized.parse().ok()
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(Gender {
    Male => "male",
    Female => "female",
    Other => "other",
});

str_enum!(CancerType {
    Brain => "brain",
    Breast => "breast",
    Kidney => "kidney",
});

impl CancerType {
    /// Screen title shown for the intake form of this category.
    pub fn screen_title(&self) -> &'static str {
        match self {
            Self::Brain => "Brain Cancer Detection",
            Self::Breast => "Breast Cancer Detection",
            Self::Kidney => "Kidney Cancer Detection",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn gender_round_trip() {
        for (variant, s) in [
            (Gender::Male, "male"),
            (Gender::Female, "female"),
            (Gender::Other, "other"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(Gender::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn cancer_type_round_trip() {
        for (variant, s) in [
            (CancerType::Brain, "brain"),
            (CancerType::Breast, "breast"),
            (CancerType::Kidney, "kidney"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(CancerType::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn strict_parse_rejects_unknown_value() {
        let err = CancerType::from_str("lung").unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidEnum { .. }));
    }

    #[test]
    fn loose_parse_accepts_form_capitalisation() {
        assert_eq!(Gender::parse_loose("Female"), Some(Gender::Female));
        assert_eq!(Gender::parse_loose("  OTHER "), Some(Gender::Other));
        assert_eq!(CancerType::parse_loose("Kidney"), Some(CancerType::Kidney));
        assert_eq!(Gender::parse_loose(""), None);
    }

    #[test]
    fn all_lists_every_variant() {
        assert_eq!(Gender::ALL.len(), 3);
        assert_eq!(CancerType::ALL.len(), 3);
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&CancerType::Breast).unwrap();
        assert_eq!(json, "\"breast\"");
    }
}
