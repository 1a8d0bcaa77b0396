// Report generation prompts.
// The structure mirrors what report::document knows how to render.

use serde::Serialize;

use crate::llm_client::prompts::{FORMAL_LANGUAGE, PLAIN_TEXT_FORMATTING};
use crate::llm_client::ChatMessage;
use crate::report::templates::ReportTemplate;

/// Kind of work a report covers. Steers which details the model emphasises.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkCategory {
    #[default]
    Development,
    Design,
    Video,
    Mixed,
}

impl WorkCategory {
    /// Unknown or missing names fall back to `development`.
    pub fn parse(name: Option<&str>) -> Self {
        match name.map(|n| n.trim().to_lowercase()).as_deref() {
            Some("design") => WorkCategory::Design,
            Some("video") => WorkCategory::Video,
            Some("mixed") => WorkCategory::Mixed,
            _ => WorkCategory::Development,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            WorkCategory::Development => "development",
            WorkCategory::Design => "design",
            WorkCategory::Video => "video",
            WorkCategory::Mixed => "mixed",
        }
    }

    pub fn instructions(&self) -> &'static str {
        match self {
            WorkCategory::Development => "\
Fokus pada aspek teknis development seperti:
- Tabel timeline development dengan milestone
- Flowchart atau diagram sistem (deskripsi verbal)
- Breakdown task development dalam format tabel
- Tech stack yang digunakan
- Bug fixes dan improvement",
            WorkCategory::Design => "\
Fokus pada aspek creative design seperti:
- Tabel deliverables design dengan status
- Deskripsi konsep dan visual guideline
- Breakdown revisi dan feedback
- Tools dan software yang digunakan
- Color palette dan typography (jika relevan)",
            WorkCategory::Video => "\
Fokus pada aspek video production seperti:
- Tabel timeline produksi video
- Breakdown scene atau segment
- Equipment dan software yang digunakan
- Durasi dan format output
- Revisi dan approval status",
            WorkCategory::Mixed => "\
Fokus pada semua aspek (Design, Development, Video) dengan:
- Tabel comprehensive untuk semua kategori pekerjaan
- Breakdown per kategori (Design / Development / Video)
- Timeline terintegrasi
- Deliverables lengkap per kategori",
        }
    }
}

const REPORT_SYSTEM_INTRO: &str = "\
Kamu adalah Gia, AI specialist dalam menyusun laporan kerja profesional yang comprehensive dan insightful.

PENDEKATAN ANALISIS:
1. Pahami nature pekerjaan dan objectives
2. Analisis setiap detail dengan critical thinking
3. Identifikasi patterns, achievements, dan challenges
4. Berikan perspective dan recommendations yang actionable";

const REPORT_STRUCTURE: &str = "\
STRUKTUR LAPORAN:

**RINGKASAN EKSEKUTIF**
Naratif 4-6 paragraf: konteks, pencapaian utama, progress & metrics, kualitas, tantangan, outlook.

**DETAIL PEKERJAAN**
Untuk setiap task: **[NOMOR]. [NAMA TASK]** dengan Status (Complete / In Progress / Pending),
Priority, Context & Background, Apa yang Dikerjakan, Tools & Technology, Hasil & Deliverables,
Challenges & Solutions, Time & Effort.

**REKOMENDASI**
Quick wins, medium-term initiatives, long-term vision, success metrics.

**KESIMPULAN**
Ringkasan akhir 2-3 paragraf yang menekankan value, achievement, dan outlook ke depan.";

/// System prompt: persona, category focus, optional template block, structure, formatting.
pub fn report_system_prompt(
    category: WorkCategory,
    template: Option<ReportTemplate>,
    image_count: usize,
) -> String {
    let mut parts: Vec<String> = vec![
        REPORT_SYSTEM_INTRO.to_string(),
        category.instructions().to_string(),
    ];
    if let Some(template) = template {
        parts.push(template.instructions());
    }
    parts.push(REPORT_STRUCTURE.to_string());
    if image_count > 0 {
        parts.push(format!(
            "**DOKUMENTASI VISUAL**\nTerdapat {image_count} dokumentasi visual yang dilampirkan \
             sebagai bukti dan referensi pekerjaan. Sebutkan di laporan."
        ));
    }
    parts.push(PLAIN_TEXT_FORMATTING.to_string());
    parts.push(FORMAL_LANGUAGE.to_string());
    parts.join("\n\n")
}

/// User prompt carrying the raw work updates.
pub fn report_user_prompt(updates: &str, category: WorkCategory, image_count: usize) -> String {
    let mut prompt = format!(
        "Buatlah laporan profesional yang detail dan comprehensive dari update pekerjaan berikut. \
         Analisis mendalam, ekstrak insights, dan berikan rekomendasi actionable:\n\n\
         UPDATE PEKERJAAN:\n{updates}\n\nKATEGORI: {}",
        category.key()
    );
    if image_count > 0 {
        prompt.push_str(&format!("\nDOKUMENTASI: {image_count} file visual dilampirkan"));
    }
    prompt
}

pub fn build_report_messages(
    updates: &str,
    category: WorkCategory,
    template: Option<ReportTemplate>,
    image_count: usize,
) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(report_system_prompt(category, template, image_count)),
        ChatMessage::user(report_user_prompt(updates, category, image_count)),
    ]
}
