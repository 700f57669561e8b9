//! Patient analytics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::AgeBand;
use crate::models::{Gender, Patient};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenderCounts {
    pub male: usize,
    pub female: usize,
    pub other: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgeBandCount {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CityCount {
    pub city: String,
    pub count: usize,
}

/// Summary of the patient collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientAnalytics {
    pub total_patients: usize,
    pub by_gender: GenderCounts,
    /// Rounded mean over patients with a known age; 0 when none
    pub average_age: u32,
    /// One entry per configured band, in band order
    pub by_age_band: Vec<AgeBandCount>,
    /// Last edited in the current calendar month
    pub edited_this_month: usize,
    pub with_assigned_doctor: usize,
    /// Non-empty cities in first-seen order
    pub by_city: Vec<CityCount>,
    /// Highest count; ties go to the city seen first
    pub most_common_city: Option<String>,
}

impl PatientAnalytics {
    /// `count` as a percentage of all patients, 0 for an empty collection.
    pub fn percentage(&self, count: usize) -> f64 {
        if self.total_patients == 0 {
            return 0.0;
        }
        count as f64 * 100.0 / self.total_patients as f64
    }

    pub fn male_percentage(&self) -> f64 {
        self.percentage(self.by_gender.male)
    }

    pub fn female_percentage(&self) -> f64 {
        self.percentage(self.by_gender.female)
    }

    pub fn assigned_doctor_percentage(&self) -> f64 {
        self.percentage(self.with_assigned_doctor)
    }
}

/// Aggregate the patient collection. Ages are computed as of `now`.
pub fn aggregate_patient_analytics(
    patients: &[Patient],
    age_bands: &[AgeBand],
    now: DateTime<Utc>,
) -> PatientAnalytics {
    let today = now.date_naive();
    let mut by_gender = GenderCounts::default();
    let mut by_age_band: Vec<AgeBandCount> = age_bands
        .iter()
        .map(|band| AgeBandCount {
            label: band.label.clone(),
            count: 0,
        })
        .collect();
    let mut by_city: Vec<CityCount> = Vec::new();
    let mut age_sum: u64 = 0;
    let mut aged: u64 = 0;
    let mut edited_this_month = 0;
    let mut with_assigned_doctor = 0;

    for patient in patients {
        match patient.gender {
            Gender::Male => by_gender.male += 1,
            Gender::Female => by_gender.female += 1,
            Gender::Other => by_gender.other += 1,
        }

        if let Some(age) = patient.age_on(today) {
            age_sum += u64::from(age);
            aged += 1;
            if let Some(i) = age_bands.iter().position(|band| band.contains(age)) {
                by_age_band[i].count += 1;
            }
        }

        if patient.edited_in_month_of(now) {
            edited_this_month += 1;
        }
        if patient.has_assigned_doctor() {
            with_assigned_doctor += 1;
        }

        let city = &patient.city;
        if !city.is_empty() {
            match by_city.iter_mut().find(|c| c.city == *city) {
                Some(entry) => entry.count += 1,
                None => by_city.push(CityCount {
                    city: city.clone(),
                    count: 1,
                }),
            }
        }
    }

    let average_age = if aged == 0 {
        0
    } else {
        (age_sum as f64 / aged as f64).round() as u32
    };

    let mut most_common: Option<&CityCount> = None;
    for entry in &by_city {
        if most_common.map_or(true, |best| entry.count > best.count) {
            most_common = Some(entry);
        }
    }
    let most_common_city = most_common.map(|c| c.city.clone());

    PatientAnalytics {
        total_patients: patients.len(),
        by_gender,
        average_age,
        by_age_band,
        edited_this_month,
        with_assigned_doctor,
        by_city,
        most_common_city,
    }
}

/// Drill-down selections behind the dashboard cards.
#[derive(Debug, Clone, PartialEq)]
pub enum PatientFilter {
    EditedThisMonth,
    WithAssignedDoctor,
    Gender(Gender),
    AgeBand(AgeBand),
    /// Exact doctor name
    AssignedDoctor(String),
    /// Exact city name
    City(String),
}

/// Patients matching `filter`, in collection order.
pub fn filter_patients<'a>(
    patients: &'a [Patient],
    filter: &PatientFilter,
    now: DateTime<Utc>,
) -> Vec<&'a Patient> {
    let today = now.date_naive();
    patients
        .iter()
        .filter(|p| match filter {
            PatientFilter::EditedThisMonth => p.edited_in_month_of(now),
            PatientFilter::WithAssignedDoctor => p.has_assigned_doctor(),
            PatientFilter::Gender(gender) => p.gender == *gender,
            PatientFilter::AgeBand(band) => p.age_on(today).is_some_and(|age| band.contains(age)),
            PatientFilter::AssignedDoctor(doctor) => p.assigned_doctor == *doctor,
            PatientFilter::City(city) => p.city == *city,
        })
        .collect()
}
