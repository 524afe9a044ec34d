//! Farm-standards survey tables
//!
//! Two static tables describe the eight survey aspects a farm is checked on.
//! [`STATUS_ASPECTS`] drives the status page and carries card images;
//! [`SURVEY_ASPECTS`] is the lighter table the farmer records are built from.

use lazy_static::lazy_static;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Result of checking one aspect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurveyStatus {
    /// Meets the standard
    Pass,
    /// Recorded, but something needs attention
    Warn,
    /// Nothing recorded yet
    None,
}

impl SurveyStatus {
    /// Thai display label used on the status page
    pub fn label(self) -> &'static str {
        match self {
            SurveyStatus::Pass => "ผ่าน",
            SurveyStatus::Warn => "ควรปรับปรุง",
            SurveyStatus::None => "ยังไม่มีข้อมูล",
        }
    }
}

/// One row of a survey table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyAspect {
    pub slug: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    pub status: SurveyStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cta_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_alt: Option<String>,
}

const LAST_UPDATED: &str = "26/02/2568 เวลา 19:00 น.";
const NOT_RECORDED: &str = "ไม่มีการบันทึกข้อมูล";
const ADD_DATA: &str = "เพิ่มข้อมูล";

// slug, title, status, note, cta
type Row = (&'static str, &'static str, SurveyStatus, &'static str, &'static str);

const ROWS: [Row; 8] = [
    ("water", "การจัดการน้ำ", SurveyStatus::Warn, "น้ำทิ้งยังมีโอกาสปนเปื้อน", "แก้ไขข้อมูล"),
    ("soil", "การจัดการที่ดิน", SurveyStatus::Pass, "แปลงเพาะปลูกเป็นตามมาตรฐาน", "ดูรายละเอียด"),
    ("fert-chem", "การใช้ปุ๋ยและยา", SurveyStatus::None, NOT_RECORDED, ADD_DATA),
    ("tools", "ยานพาหนะ อุปกรณ์", SurveyStatus::None, NOT_RECORDED, ADD_DATA),
    ("harvest", "การเก็บเกี่ยว", SurveyStatus::None, NOT_RECORDED, ADD_DATA),
    ("postharvest", "การพักผลผลิต", SurveyStatus::None, NOT_RECORDED, ADD_DATA),
    ("facilities", "สถานที่ต่าง ๆ", SurveyStatus::None, NOT_RECORDED, ADD_DATA),
    ("workers", "ผู้ปฏิบัติงาน", SurveyStatus::None, NOT_RECORDED, ADD_DATA),
];

// image file stem and alt text for the status cards, same order as ROWS
const IMAGES: [(&str, &str); 8] = [
    ("water", "water management"),
    ("soil", "soil management"),
    ("fertilizer", "fertilizer and chemical usage"),
    ("tools", "tools and equipment"),
    ("harvest", "harvest process"),
    ("postharvest", "postharvest storage"),
    ("facilities", "facilities and environment"),
    ("workers", "workers and laborers"),
];

fn base_aspect(&(slug, title, status, note, cta): &Row) -> SurveyAspect {
    SurveyAspect {
        slug: slug.to_string(),
        title: title.to_string(),
        // only the aspects with data have a timestamp
        last_updated: (status != SurveyStatus::None).then(|| LAST_UPDATED.to_string()),
        status,
        note: Some(note.to_string()),
        cta_label: Some(cta.to_string()),
        image: None,
        image_alt: None,
    }
}

lazy_static! {
    /// Aspects shown on the status page, with card images
    pub static ref STATUS_ASPECTS: Vec<SurveyAspect> = ROWS
        .iter()
        .zip(IMAGES.iter())
        .map(|(row, (stem, alt))| SurveyAspect {
            image: Some(format!("/images/{stem}.jpg")),
            image_alt: Some(alt.to_string()),
            ..base_aspect(row)
        })
        .collect();

    /// Aspects used for farmer survey records
    pub static ref SURVEY_ASPECTS: Vec<SurveyAspect> = ROWS
        .iter()
        .map(|row| SurveyAspect {
            image_alt: Some(row.0.to_string()),
            ..base_aspect(row)
        })
        .collect();
}

/// Find an aspect in a table by slug
pub fn find_aspect<'a>(table: &'a [SurveyAspect], slug: &str) -> Option<&'a SurveyAspect> {
    table.iter().find(|aspect| aspect.slug == slug)
}

/// Copy a table, dropping card images whose file is missing from `assets_dir`
///
/// Image paths are served from `/images/`, so `/images/water.jpg` is looked
/// up as `<assets_dir>/water.jpg`. Paths outside `/images/` are kept as is.
pub fn with_available_images(table: &[SurveyAspect], assets_dir: &Path) -> Vec<SurveyAspect> {
    table
        .iter()
        .map(|aspect| {
            let mut aspect = aspect.clone();
            if let Some(file) = aspect.image.as_deref().and_then(|i| i.strip_prefix("/images/")) {
                if !assets_dir.join(file).is_file() {
                    debug!("No image {file} in {}, hiding it", assets_dir.display());
                    aspect.image = None;
                }
            }
            aspect
        })
        .collect()
}

/// Count of aspects per status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    pub pass: usize,
    pub warn: usize,
    pub none: usize,
}

impl StatusSummary {
    /// Tally the statuses of a set of aspects
    pub fn of<'a>(aspects: impl IntoIterator<Item = &'a SurveyAspect>) -> Self {
        aspects
            .into_iter()
            .fold(StatusSummary::default(), |mut summary, aspect| {
                match aspect.status {
                    SurveyStatus::Pass => summary.pass += 1,
                    SurveyStatus::Warn => summary.warn += 1,
                    SurveyStatus::None => summary.none += 1,
                }
                summary
            })
    }

    pub fn total(&self) -> usize {
        self.pass + self.warn + self.none
    }
}
