//! Farmer records and their survey progress

use lazy_static::lazy_static;
use serde::Serialize;

use crate::survey::{SURVEY_ASPECTS, StatusSummary, SurveyAspect};

const RECORDED_NOTE: &str = "บันทึกข้อมูลแล้ว";
const RECORDED_CTA: &str = "แก้ไขข้อมูล";
const MISSING_NOTE: &str = "ยังไม่มีการบันทึก";
const MISSING_CTA: &str = "เพิ่มข้อมูล";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Farmer {
    pub id: String,
    pub name: String,
    pub area: String,
    pub surveys: Vec<SurveyAspect>,
}

impl Farmer {
    fn new(id: &str, name: &str, area: &str, recorded: &[&str]) -> Self {
        Farmer {
            id: id.to_string(),
            name: name.to_string(),
            area: area.to_string(),
            surveys: surveys_for(recorded),
        }
    }

    /// Number of aspects this farmer has recorded data for
    pub fn recorded_count(&self) -> usize {
        self.surveys
            .iter()
            .filter(|aspect| aspect.note.as_deref() == Some(RECORDED_NOTE))
            .count()
    }

    /// Status tally over this farmer's surveys
    pub fn summary(&self) -> StatusSummary {
        StatusSummary::of(&self.surveys)
    }
}

/// Build a farmer's survey list from the aspect table
///
/// Every aspect in [`SURVEY_ASPECTS`] is copied; the ones whose slug is in
/// `recorded` are marked as recorded, the rest as still missing.
///
/// # Arguments
/// * `recorded` - Slugs of the aspects the farmer has data for
///
/// # Returns
/// * `Vec<SurveyAspect>` - One entry per aspect, in table order
pub fn surveys_for(recorded: &[&str]) -> Vec<SurveyAspect> {
    SURVEY_ASPECTS
        .iter()
        .map(|aspect| {
            let (note, cta) = if recorded.contains(&aspect.slug.as_str()) {
                (RECORDED_NOTE, RECORDED_CTA)
            } else {
                (MISSING_NOTE, MISSING_CTA)
            };

            SurveyAspect {
                note: Some(note.to_string()),
                cta_label: Some(cta.to_string()),
                ..aspect.clone()
            }
        })
        .collect()
}

lazy_static! {
    pub static ref FARMERS: Vec<Farmer> = vec![
        Farmer::new("F001", "นายสมชาย ใจดี", "เชียงใหม่", &["water", "soil"]),
        Farmer::new("F002", "นางสาวกัญญา แสงทอง", "ลพบุรี", &["fert-chem"]),
        Farmer::new("F003", "นายธีรภัทร วิชัย", "นครปฐม", &[]),
    ];
}

pub fn find_farmer(id: &str) -> Option<&'static Farmer> {
    FARMERS.iter().find(|farmer| farmer.id == id)
}
