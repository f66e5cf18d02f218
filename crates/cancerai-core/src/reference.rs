//! Static reference lists offered to clients building input forms.

pub const CANCER_TYPES: &[&str] = &[
    "Breast Cancer",
    "Lung Cancer",
    "Prostate Cancer",
    "Colorectal Cancer",
    "Melanoma",
    "Pancreatic Cancer",
    "Leukemia",
    "Ovarian Cancer",
];

pub const STAGES: &[&str] = &["I", "II", "III", "IV"];

pub const TREATMENTS: &[&str] = &[
    "Surgery",
    "Chemotherapy",
    "Radiation",
    "Immunotherapy",
    "Surgery + Chemotherapy",
    "Surgery + Radiation",
    "Chemotherapy + Radiation",
    "Multimodal",
];
