//! Field registry: the static description of every loan-application input.
//!
//! The registry is the single source of truth for:
//!
//! - wire names used in the scoring request
//! - labels, placeholders, and defaults shown by front-ends
//! - the closed choice lists of enumerated inputs
//! - numeric bounds carried over from the application form

/// One of the nine fixed application fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldKey {
    ApplicantIncome,
    LoanAmount,
    ExistingDebt,
    LoanTermMonths,
    CreditHistoryMonths,
    EmploymentStatus,
    Education,
    PropertyArea,
    Dependents,
}

/// How a field is edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Free-text number typed by the user.
    Numeric,
    /// Closed list of choices.
    Enumerated,
}

/// Type the raw value is coerced to in the scoring request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Float,
    Integer,
    Text,
}

/// A legal value of an enumerated field plus its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub value: &'static str,
    pub label: &'static str,
}

/// Static metadata for one field.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub key: FieldKey,
    pub wire_name: &'static str,
    pub label: &'static str,
    pub section: Section,
    pub input: InputKind,
    pub value_type: ValueType,
    pub default: &'static str,
    pub placeholder: &'static str,
    pub choices: &'static [Choice],
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Form grouping used by front-ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Financial,
    Personal,
}

impl Section {
    pub fn title(self) -> &'static str {
        match self {
            Section::Financial => "Financial Information",
            Section::Personal => "Personal Information",
        }
    }
}

const LOAN_TERMS: &[Choice] = &[
    Choice {
        value: "60",
        label: "5 Years (60 months)",
    },
    Choice {
        value: "120",
        label: "10 Years (120 months)",
    },
    Choice {
        value: "180",
        label: "15 Years (180 months)",
    },
    Choice {
        value: "240",
        label: "20 Years (240 months)",
    },
    Choice {
        value: "360",
        label: "30 Years (360 months)",
    },
];

const EMPLOYMENT: &[Choice] = &[
    Choice {
        value: "employed",
        label: "Employed",
    },
    Choice {
        value: "self_employed",
        label: "Self-Employed",
    },
    Choice {
        value: "unemployed",
        label: "Unemployed",
    },
];

const EDUCATION: &[Choice] = &[
    Choice {
        value: "graduate",
        label: "Graduate",
    },
    Choice {
        value: "not_graduate",
        label: "Not Graduate",
    },
];

const PROPERTY_AREA: &[Choice] = &[
    Choice {
        value: "urban",
        label: "Urban",
    },
    Choice {
        value: "suburban",
        label: "Suburban",
    },
    Choice {
        value: "rural",
        label: "Rural",
    },
];

const DEPENDENTS: &[Choice] = &[
    Choice {
        value: "0",
        label: "0",
    },
    Choice {
        value: "1",
        label: "1",
    },
    Choice {
        value: "2",
        label: "2",
    },
    Choice {
        value: "3",
        label: "3",
    },
    Choice {
        value: "4",
        label: "4",
    },
    Choice {
        value: "5",
        label: "5",
    },
];

const fn numeric(
    key: FieldKey,
    wire_name: &'static str,
    label: &'static str,
    section: Section,
    value_type: ValueType,
    placeholder: &'static str,
    max: Option<f64>,
) -> FieldSpec {
    FieldSpec {
        key,
        wire_name,
        label,
        section,
        input: InputKind::Numeric,
        value_type,
        default: "",
        placeholder,
        choices: &[],
        min: Some(0.0),
        max,
    }
}

const fn enumerated(
    key: FieldKey,
    wire_name: &'static str,
    label: &'static str,
    section: Section,
    value_type: ValueType,
    default: &'static str,
    choices: &'static [Choice],
) -> FieldSpec {
    FieldSpec {
        key,
        wire_name,
        label,
        section,
        input: InputKind::Enumerated,
        value_type,
        default,
        placeholder: "",
        choices,
        min: None,
        max: None,
    }
}

/// Registry entries, in form order (the same order as `FieldKey::ALL`).
static REGISTRY: [FieldSpec; 9] = [
    numeric(
        FieldKey::ApplicantIncome,
        "applicant_income",
        "Annual Income (USD)",
        Section::Financial,
        ValueType::Float,
        "50000",
        None,
    ),
    numeric(
        FieldKey::LoanAmount,
        "loan_amount",
        "Loan Amount (USD)",
        Section::Financial,
        ValueType::Float,
        "150000",
        None,
    ),
    numeric(
        FieldKey::ExistingDebt,
        "existing_debt",
        "Existing Debt (USD)",
        Section::Financial,
        ValueType::Float,
        "15000",
        None,
    ),
    enumerated(
        FieldKey::LoanTermMonths,
        "loan_term_months",
        "Loan Term (Months)",
        Section::Financial,
        ValueType::Integer,
        "360",
        LOAN_TERMS,
    ),
    numeric(
        FieldKey::CreditHistoryMonths,
        "credit_history_months",
        "Credit History (Months)",
        Section::Personal,
        ValueType::Integer,
        "84",
        Some(600.0),
    ),
    enumerated(
        FieldKey::EmploymentStatus,
        "employment_status",
        "Employment Status",
        Section::Personal,
        ValueType::Text,
        "employed",
        EMPLOYMENT,
    ),
    enumerated(
        FieldKey::Education,
        "education",
        "Education",
        Section::Personal,
        ValueType::Text,
        "graduate",
        EDUCATION,
    ),
    enumerated(
        FieldKey::PropertyArea,
        "property_area",
        "Property Area",
        Section::Personal,
        ValueType::Text,
        "urban",
        PROPERTY_AREA,
    ),
    enumerated(
        FieldKey::Dependents,
        "dependents",
        "Number of Dependents",
        Section::Personal,
        ValueType::Integer,
        "0",
        DEPENDENTS,
    ),
];

impl FieldKey {
    pub const COUNT: usize = 9;

    /// All fields in form order.
    pub const ALL: [FieldKey; FieldKey::COUNT] = [
        FieldKey::ApplicantIncome,
        FieldKey::LoanAmount,
        FieldKey::ExistingDebt,
        FieldKey::LoanTermMonths,
        FieldKey::CreditHistoryMonths,
        FieldKey::EmploymentStatus,
        FieldKey::Education,
        FieldKey::PropertyArea,
        FieldKey::Dependents,
    ];

    /// Position of this field in `ALL` (and in the registry).
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn spec(self) -> &'static FieldSpec {
        &REGISTRY[self.index()]
    }

    pub fn wire_name(self) -> &'static str {
        self.spec().wire_name
    }

    pub fn label(self) -> &'static str {
        self.spec().label
    }

    pub fn default_value(self) -> &'static str {
        self.spec().default
    }

    pub fn from_wire_name(name: &str) -> Option<FieldKey> {
        FieldKey::ALL.into_iter().find(|k| k.wire_name() == name)
    }

    /// Display label for a raw value of an enumerated field.
    ///
    /// Returns `None` for numeric fields or values outside the choice list.
    pub fn choice_label(self, value: &str) -> Option<&'static str> {
        self.spec()
            .choices
            .iter()
            .find(|c| c.value == value)
            .map(|c| c.label)
    }

    /// The choice following `current`, wrapping around.
    ///
    /// An unknown `current` value selects the first choice.
    pub fn next_choice(self, current: &str) -> Option<&'static str> {
        self.step_choice(current, 1)
    }

    /// The choice preceding `current`, wrapping around.
    pub fn prev_choice(self, current: &str) -> Option<&'static str> {
        self.step_choice(current, -1)
    }

    fn step_choice(self, current: &str, delta: isize) -> Option<&'static str> {
        let choices = self.spec().choices;
        if choices.is_empty() {
            return None;
        }
        let len = choices.len() as isize;
        let next = match choices.iter().position(|c| c.value == current) {
            Some(pos) => (pos as isize + delta).rem_euclid(len),
            None => 0,
        };
        Some(choices[next as usize].value)
    }
}

impl std::fmt::Display for FieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}
