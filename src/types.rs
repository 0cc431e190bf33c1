//! Employee records produced by the import pipeline.
//!
//! A [`NewEmployee`] is the candidate built from one source row. The store turns it into an
//! [`Employee`] by assigning an identity. Field names on the wire are camelCase (`mesEntrada`),
//! matching what the web UI sends and expects.

use serde::{Deserialize, Serialize};

/// Number of positional fields every source row must provide.
pub const EMPLOYEE_FIELD_COUNT: usize = 8;

/// Column order expected in both CSV and spreadsheet uploads.
pub const EMPLOYEE_COLUMNS: [&str; EMPLOYEE_FIELD_COUNT] = [
    "nome",
    "email",
    "time",
    "mesEntrada",
    "fabrica",
    "senioridade",
    "cargo",
    "modelo",
];

/// An employee record that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployee {
    /// Full name.
    pub nome: String,
    /// Email address. Uniqueness is the store's concern.
    pub email: String,
    /// Team/squad name.
    pub time: String,
    /// Entry month, free text.
    pub mes_entrada: String,
    /// Sourcing channel.
    pub fabrica: String,
    /// Seniority level, see [`Seniority`] for the known values.
    pub senioridade: String,
    /// Job title, see [`Role`] for the known values.
    pub cargo: String,
    /// Engagement model, see [`EngagementModel`] for the known values.
    pub modelo: String,
}

impl NewEmployee {
    /// Attach a store-assigned identity.
    pub fn with_id(self, id: u64) -> Employee {
        Employee { id, record: self }
    }

    pub fn seniority(&self) -> Option<Seniority> {
        Seniority::parse(&self.senioridade)
    }

    pub fn role(&self) -> Option<Role> {
        Role::parse(&self.cargo)
    }

    pub fn engagement_model(&self) -> Option<EngagementModel> {
        EngagementModel::parse(&self.modelo)
    }
}

/// A persisted employee record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Surrogate identity assigned by the store on insert.
    pub id: u64,
    #[serde(flatten)]
    pub record: NewEmployee,
}

macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every known value, in display order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Label as shown in the UI.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            /// Exact (trimmed) label match. Unknown labels return `None`.
            pub fn parse(label: &str) -> Option<Self> {
                let label = label.trim();
                Self::ALL.iter().copied().find(|v| v.as_str() == label)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

vocabulary! {
    /// Seniority levels offered by the UI. Imports accept any text.
    Seniority {
        Intern => "Estagiário",
        Junior => "Junior",
        Mid => "Pleno",
        Senior => "Senior",
        Leadership => "Liderança",
        StaffEngineer => "Staff Engineer",
        PrincipalEngineer => "Principal Engineer",
    }
}

vocabulary! {
    /// Job titles offered by the UI.
    Role {
        BackEndDeveloper => "Dev BackEnd",
        FrontEndDeveloper => "Dev FrontEnd",
        Qa => "QA",
        TechManager => "Tech Manager",
        Manager => "Gerente",
        Director => "Diretor",
        StaffEng => "Staff Eng",
        PrincipalEng => "Principal Eng",
    }
}

vocabulary! {
    /// Contract type: contractor (`PJ`) or salaried employee (`CLT`).
    EngagementModel {
        Contractor => "PJ",
        Salaried => "CLT",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ana() -> NewEmployee {
        NewEmployee {
            nome: "Ana".to_string(),
            email: "ana@x.com".to_string(),
            time: "Core Banking".to_string(),
            mes_entrada: "Março".to_string(),
            fabrica: "Interno".to_string(),
            senioridade: "Junior".to_string(),
            cargo: "Dev BackEnd".to_string(),
            modelo: "PJ".to_string(),
        }
    }

    #[test]
    fn employee_serializes_flat_with_camel_case_names() {
        let json = serde_json::to_value(ana().with_id(7)).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["mesEntrada"], "Março");
        assert_eq!(json["nome"], "Ana");
        assert!(json.get("record").is_none());
    }

    #[test]
    fn vocabulary_lookups_are_optional() {
        let mut e = ana();
        assert_eq!(e.seniority(), Some(Seniority::Junior));
        assert_eq!(e.role(), Some(Role::BackEndDeveloper));
        assert_eq!(e.engagement_model(), Some(EngagementModel::Contractor));

        e.senioridade = "Wizard".to_string();
        assert_eq!(e.seniority(), None);
    }
}
