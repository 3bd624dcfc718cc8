//! The persisted clinic document and its default seed.
//!
//! The document is the single JSON-serializable aggregate holding all
//! application state. When no persisted copy exists, [`Document::default_seed`]
//! builds the fixed account pair and the priced catalog the clinic opens with.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{Invoice, Role, Service, SystemInfo, User};

/// Version stamp written into new documents and snapshot metadata.
pub const DOCUMENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Currency code used across the document.
pub const CURRENCY: &str = "PKR";

/// X-Ray catalog names, seeded at 500.00 each.
const XRAY_SERVICES: [&str; 21] = [
    "X ray",
    "Skull AP/LAT",
    "FACE AP/LAT",
    "MANDIBLE P.A VIEW",
    "SHOULDER AP/LAT",
    "HUMERUS AP/LAT",
    "ELBOW JOINT AP/LAT",
    "RADIUS ULNA AP/LAT",
    "HAND AP/LAT",
    "CHEST PA VIEW",
    "CHEST AP VIEW",
    "ABDOMEN ERECT/SUPINE",
    "PELVIS",
    "FEMUR AP/LAT",
    "KNEE JOINT AP/LAT",
    "TIBIA FIBULA AP/LAT",
    "ANKLE JOINT AP/LAT",
    "FOOT AP/LAT",
    "CERVICAL SPINE",
    "THORACIC SPINE",
    "LUMBAR SPINE",
];

/// Ultrasound catalog names, seeded at 800.00 each.
const ULTRASOUND_SERVICES: [&str; 26] = [
    "USG ABDOMEN",
    "USG KUB",
    "USG UPPER LIMB",
    "USG LOWER LIMB",
    "CAROTID DOPPLER",
    "RENAL ARTERY DOPPLER",
    "ANOMALY SCAN",
    "OBS SCAN",
    "SCROTAL USG",
    "USG BREAST",
    "USG CHEST",
    "USG THYROID",
    "USG SWELLING",
    "CRANIAL",
    "Abdominal Ultrasound",
    "Pelvic Ultrasound",
    "Obstetric Ultrasound",
    "Cardiac Ultrasound",
    "Thyroid Ultrasound",
    "Breast Ultrasound",
    "Musculoskeletal Ultrasound",
    "Vascular Ultrasound",
    "Transrectal Ultrasound",
    "Transvaginal Ultrasound",
    "Fetal Ultrasound",
    "Testicular Ultrasound",
];

/// Lab test catalog names, seeded at 300.00 each.
const LAB_SERVICES: [&str; 20] = [
    "CBC (Complete Blood Count)",
    "Blood Sugar Test",
    "Lipid Profile",
    "Liver Function Test (LFTs)",
    "Kidney Function Test (KFTs)",
    "Thyroid Function Test (TFTs)",
    "Electrolyte Panel",
    "Urine Routine Examination (URE)",
    "Stool Routine Examination (SRE)",
    "Blood Urea Nitrogen (BUN)",
    "Creatinine Test",
    "Uric Acid Test",
    "Cholesterol Test",
    "Triglycerides Test",
    "HDL (High-Density Lipoprotein) Test",
    "LDL (Low-Density Lipoprotein) Test",
    "SGPT (Alanine Transaminase) Test",
    "SGOT (Aspartate Transaminase) Test",
    "Alkaline Phosphatase Test",
    "Bilirubin Test",
];

/// The single persisted aggregate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// User accounts.
    pub users: Vec<User>,
    /// Priced service catalog.
    pub services: Vec<Service>,
    /// Issued invoices in creation order.
    pub invoices: Vec<Invoice>,
    /// Document metadata.
    pub system_info: SystemInfo,
}

impl Document {
    /// Builds the default document: one regular and one admin account, the
    /// seed catalog, no invoices, and metadata stamped at `now`.
    #[must_use]
    pub fn default_seed(now: DateTime<Utc>) -> Self {
        Self {
            users: vec![
                User {
                    id: 1,
                    username: "moavia".to_string(),
                    password: "moavia".to_string(),
                    role: Role::User,
                },
                User {
                    id: 2,
                    username: "admin".to_string(),
                    password: "admin".to_string(),
                    role: Role::Admin,
                },
            ],
            services: seed_services(),
            invoices: Vec::new(),
            system_info: SystemInfo {
                version: DOCUMENT_VERSION.to_string(),
                created: now,
                last_updated: now,
                currency: CURRENCY.to_string(),
            },
        }
    }

    /// Total records across users, services, and invoices.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.users.len() + self.services.len() + self.invoices.len()
    }
}

/// Builds the seed catalog with contiguous ids starting at 1.
fn seed_services() -> Vec<Service> {
    let groups: [(&str, f64, &[&str]); 3] = [
        ("X-Ray", 500.0, &XRAY_SERVICES),
        ("Ultrasound", 800.0, &ULTRASOUND_SERVICES),
        ("Lab Test", 300.0, &LAB_SERVICES),
    ];

    let mut services = Vec::new();
    let mut id = 1;
    for (category, price, names) in groups {
        for name in names {
            services.push(Service {
                id,
                category: category.to_string(),
                name: (*name).to_string(),
                price,
            });
            id += 1;
        }
    }
    services
}
