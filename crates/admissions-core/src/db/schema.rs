//! SQLite schema definition.

/// Complete database schema for hospital admissions.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Patients
-- ============================================================================

CREATE TABLE IF NOT EXISTS patients (
    patient_id TEXT PRIMARY KEY,                 -- PAT-<initials>-<sequence>
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    middle_name TEXT,
    date_of_birth TEXT NOT NULL,                 -- YYYY-MM-DD
    sex TEXT NOT NULL,
    height REAL,
    weight REAL,
    marital_status TEXT,
    contact_number TEXT,
    email_address TEXT,
    street_address TEXT,
    city TEXT,
    province TEXT,
    zip_code TEXT,
    emergency_name TEXT,
    emergency_relationship TEXT,
    emergency_contact_number TEXT,
    password_hash TEXT
);

CREATE INDEX IF NOT EXISTS idx_patients_marital_status ON patients(marital_status);

-- Last issued sequence number per identifier prefix (e.g. 'PAT-AB-')
CREATE TABLE IF NOT EXISTS patient_id_sequences (
    prefix TEXT PRIMARY KEY,
    last_value INTEGER NOT NULL CHECK (last_value >= 0)
);

-- ============================================================================
-- Doctors
-- ============================================================================

CREATE TABLE IF NOT EXISTS doctors (
    doctor_id INTEGER PRIMARY KEY AUTOINCREMENT,
    doctor_name TEXT NOT NULL,
    shift_start TEXT NOT NULL,                   -- HH:MM:SS
    shift_end TEXT NOT NULL,                     -- HH:MM:SS
    status TEXT NOT NULL DEFAULT 'A' CHECK (status IN ('A', 'I', 'L')),
    password_hash TEXT
);

CREATE INDEX IF NOT EXISTS idx_doctors_status ON doctors(status);

-- ============================================================================
-- Admissions
-- ============================================================================

CREATE TABLE IF NOT EXISTS admissions (
    admission_id INTEGER PRIMARY KEY AUTOINCREMENT,
    patient_id TEXT NOT NULL REFERENCES patients(patient_id),
    doctor_id INTEGER REFERENCES doctors(doctor_id),  -- NULL until assigned
    admission_date TEXT NOT NULL,
    complaints TEXT,
    medications TEXT,
    "procedure" TEXT,
    diagnosis TEXT,
    discharge_date TEXT                              -- NULL while admitted
);

CREATE INDEX IF NOT EXISTS idx_admissions_patient ON admissions(patient_id);
CREATE INDEX IF NOT EXISTS idx_admissions_doctor ON admissions(doctor_id);
CREATE INDEX IF NOT EXISTS idx_admissions_date ON admissions(admission_date);

-- ============================================================================
-- Visitors
-- ============================================================================

CREATE TABLE IF NOT EXISTS visitors (
    visitor_id INTEGER PRIMARY KEY AUTOINCREMENT,
    patient_id TEXT NOT NULL REFERENCES patients(patient_id),
    visitor_name TEXT NOT NULL,
    relationship TEXT,
    contact_number TEXT,
    visit_date TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_visitors_patient ON visitors(patient_id);
CREATE INDEX IF NOT EXISTS idx_visitors_date ON visitors(visit_date);
"#;
