//! Demo records the dashboard starts with.

use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};

use crate::config::ClinicConfig;
use crate::models::{
    Appointment, AppointmentStatus, AppointmentType, Bill, BillItem, BillStatus, Gender, Patient,
    PatientInput,
};
use crate::records::{Clock, ClinicStore, SystemClock};

struct SeedPatient {
    patient_id: &'static str,
    first_name: &'static str,
    last_name: &'static str,
    gender: Gender,
    born: (i32, u32, u32),
    email: &'static str,
    mobile_phone: &'static str,
    address: [&'static str; 6],
    occupation: &'static str,
    assigned_doctor: &'static str,
    referred_by: &'static str,
    old_mrd_id: &'static str,
    remarks: &'static str,
    edited: (i32, u32, u32),
}

const PATIENTS: [SeedPatient; 10] = [
    SeedPatient {
        patient_id: "P001",
        first_name: "John",
        last_name: "Doe",
        gender: Gender::Male,
        born: (1990, 5, 15),
        email: "john.doe@example.com",
        mobile_phone: "+1234567890",
        address: ["123 Main St", "Apt 4B", "New York", "NY", "10001", "USA"],
        occupation: "Software Engineer",
        assigned_doctor: "Dr. Smith",
        referred_by: "Dr. Johnson",
        old_mrd_id: "MRD001",
        remarks: "Regular checkup required",
        edited: (2024, 2, 20),
    },
    SeedPatient {
        patient_id: "P002",
        first_name: "Muthu",
        last_name: "Kumar",
        gender: Gender::Male,
        born: (1995, 8, 22),
        email: "mutew.m@gmail.com",
        mobile_phone: "+919500198197",
        address: ["456 Park Avenue", "Flat 3C", "Chennai", "Tamil Nadu", "600001", "India"],
        occupation: "IT Professional",
        assigned_doctor: "Dr. Rajesh",
        referred_by: "Dr. Priya",
        old_mrd_id: "MRD002",
        remarks: "Follow-up required in 3 months",
        edited: (2024, 2, 21),
    },
    SeedPatient {
        patient_id: "P003",
        first_name: "Sarah",
        last_name: "Wilson",
        gender: Gender::Female,
        born: (1985, 3, 10),
        email: "sarah.w@example.com",
        mobile_phone: "+1987654321",
        address: ["789 Oak Street", "", "Los Angeles", "CA", "90001", "USA"],
        occupation: "Teacher",
        assigned_doctor: "Dr. Brown",
        referred_by: "Dr. Davis",
        old_mrd_id: "MRD003",
        remarks: "Annual checkup completed",
        edited: (2024, 2, 19),
    },
    SeedPatient {
        patient_id: "P004",
        first_name: "Michael",
        last_name: "Chen",
        gender: Gender::Male,
        born: (1992, 11, 25),
        email: "michael.c@example.com",
        mobile_phone: "+1122334455",
        address: ["321 Pine Road", "Unit 7", "San Francisco", "CA", "94101", "USA"],
        occupation: "Data Scientist",
        assigned_doctor: "Dr. Lee",
        referred_by: "Dr. Wang",
        old_mrd_id: "MRD004",
        remarks: "Follow-up scheduled",
        edited: (2024, 2, 18),
    },
    SeedPatient {
        patient_id: "P005",
        first_name: "Emma",
        last_name: "Thompson",
        gender: Gender::Female,
        born: (1998, 7, 30),
        email: "emma.t@example.com",
        mobile_phone: "+1445566778",
        address: ["654 Maple Drive", "", "Chicago", "IL", "60601", "USA"],
        occupation: "Marketing Manager",
        assigned_doctor: "Dr. Anderson",
        referred_by: "Dr. Taylor",
        old_mrd_id: "MRD005",
        remarks: "Initial consultation completed",
        edited: (2024, 2, 17),
    },
    SeedPatient {
        patient_id: "P006",
        first_name: "David",
        last_name: "Kim",
        gender: Gender::Male,
        born: (1988, 4, 12),
        email: "david.k@example.com",
        mobile_phone: "+1990011223",
        address: ["987 Cedar Lane", "Apt 12D", "Seattle", "WA", "98101", "USA"],
        occupation: "Product Manager",
        assigned_doctor: "Dr. Park",
        referred_by: "Dr. Choi",
        old_mrd_id: "MRD006",
        remarks: "Regular checkup required",
        edited: (2024, 2, 16),
    },
    SeedPatient {
        patient_id: "P007",
        first_name: "Lisa",
        last_name: "Garcia",
        gender: Gender::Female,
        born: (1993, 9, 18),
        email: "lisa.g@example.com",
        mobile_phone: "+1556677889",
        address: ["147 Birch Street", "", "Miami", "FL", "33101", "USA"],
        occupation: "Nurse",
        assigned_doctor: "Dr. Rodriguez",
        referred_by: "Dr. Martinez",
        old_mrd_id: "MRD007",
        remarks: "Follow-up in 2 weeks",
        edited: (2024, 2, 15),
    },
    SeedPatient {
        patient_id: "P008",
        first_name: "James",
        last_name: "Wilson",
        gender: Gender::Male,
        born: (1965, 12, 5),
        email: "james.w@example.com",
        mobile_phone: "+1667788990",
        address: ["258 Elm Avenue", "Suite 5", "Boston", "MA", "02101", "USA"],
        occupation: "Retired",
        assigned_doctor: "Dr. Thompson",
        referred_by: "Dr. Brown",
        old_mrd_id: "MRD008",
        remarks: "Annual checkup completed",
        edited: (2024, 2, 14),
    },
    SeedPatient {
        patient_id: "P009",
        first_name: "Sophia",
        last_name: "Lee",
        gender: Gender::Female,
        born: (1997, 2, 28),
        email: "sophia.l@example.com",
        mobile_phone: "+1778899001",
        address: ["369 Willow Road", "", "Houston", "TX", "77001", "USA"],
        occupation: "Graphic Designer",
        assigned_doctor: "Dr. Chen",
        referred_by: "Dr. Wang",
        old_mrd_id: "MRD009",
        remarks: "Initial consultation scheduled",
        edited: (2024, 2, 13),
    },
    SeedPatient {
        patient_id: "P010",
        first_name: "Robert",
        last_name: "Taylor",
        gender: Gender::Male,
        born: (1991, 6, 15),
        email: "robert.t@example.com",
        mobile_phone: "+1889900112",
        address: ["741 Ash Street", "Apt 8E", "Denver", "CO", "80201", "USA"],
        occupation: "Architect",
        assigned_doctor: "Dr. Anderson",
        referred_by: "Dr. Smith",
        old_mrd_id: "MRD010",
        remarks: "Follow-up required",
        edited: (2024, 2, 12),
    },
];

fn date((y, m, d): (i32, u32, u32)) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn seed_patient(seed: &SeedPatient) -> Patient {
    let [address1, address2, city, state, pincode, country] = seed.address;
    let mut input = PatientInput::new(
        seed.first_name,
        seed.last_name,
        seed.gender,
        seed.email,
        seed.mobile_phone,
    );
    input.patient_id = Some(seed.patient_id.into());
    input.date_of_birth = Some(date(seed.born));
    input.address1 = address1.into();
    input.address2 = address2.into();
    input.city = city.into();
    input.state = state.into();
    input.pincode = pincode.into();
    input.country = country.into();
    input.occupation = seed.occupation.into();
    input.assigned_doctor = seed.assigned_doctor.into();
    input.referred_by = seed.referred_by.into();
    input.old_mrd_id = seed.old_mrd_id.into();
    input.remarks = seed.remarks.into();

    let (y, m, d) = seed.edited;
    let edited = Utc
        .with_ymd_and_hms(y, m, d, 0, 0, 0)
        .single()
        .unwrap_or_default();
    Patient::from_input(seed.patient_id.into(), input, edited)
}

/// Demo patients.
pub fn sample_patients() -> Vec<Patient> {
    PATIENTS.iter().map(seed_patient).collect()
}

/// Demo appointments for the demo patients.
pub fn sample_appointments() -> Vec<Appointment> {
    vec![
        Appointment {
            id: 1,
            patient_id: "P001".into(),
            patient_name: "John Doe".into(),
            date: date((2024, 3, 28)),
            time: "10:00".into(),
            appointment_type: AppointmentType::CataractConsultation,
            status: AppointmentStatus::Scheduled,
        },
        Appointment {
            id: 2,
            patient_id: "P003".into(),
            patient_name: "Sarah Wilson".into(),
            date: date((2024, 3, 28)),
            time: "14:30".into(),
            appointment_type: AppointmentType::GlaucomaScreening,
            status: AppointmentStatus::Scheduled,
        },
    ]
}

/// Demo bills.
pub fn sample_bills() -> Vec<Bill> {
    vec![Bill {
        id: 1,
        bill_number: "BILL-001".into(),
        patient_id: "P001".into(),
        patient_name: "John Doe".into(),
        date: date((2024, 3, 1)),
        items: vec![
            BillItem::new("Consultation Fee", 1.0, 100.0),
            BillItem::new("Medicine", 2.0, 50.0),
        ],
        total_amount: 200.0,
        status: BillStatus::Paid,
        payment_method: Some("Credit Card".into()),
        notes: None,
    }]
}

impl ClinicStore {
    /// Store pre-filled with the demo records, using the system clock.
    pub fn with_sample_data(config: ClinicConfig) -> Self {
        Self::with_sample_data_and_clock(config, Arc::new(SystemClock))
    }

    pub fn with_sample_data_and_clock(config: ClinicConfig, clock: Arc<dyn Clock>) -> Self {
        Self::from_records(
            config,
            clock,
            sample_patients(),
            sample_appointments(),
            sample_bills(),
        )
    }
}
