//! Report templates — section outlines and writing guidelines per report type.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportTemplate {
    Weekly,
    Monthly,
    Project,
    Client,
    Technical,
    Design,
}

/// Static description of one template.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateInfo {
    pub name: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
    pub default_title: &'static str,
    pub sections: &'static [&'static str],
    pub guidelines: &'static [&'static str],
    pub tone: &'static str,
}

impl ReportTemplate {
    pub const ALL: [ReportTemplate; 6] = [
        ReportTemplate::Weekly,
        ReportTemplate::Monthly,
        ReportTemplate::Project,
        ReportTemplate::Client,
        ReportTemplate::Technical,
        ReportTemplate::Design,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            ReportTemplate::Weekly => "weekly",
            ReportTemplate::Monthly => "monthly",
            ReportTemplate::Project => "project",
            ReportTemplate::Client => "client",
            ReportTemplate::Technical => "technical",
            ReportTemplate::Design => "design",
        }
    }

    /// Case-insensitive lookup by key. Unknown names mean "no template".
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.key().eq_ignore_ascii_case(name))
    }

    pub fn info(&self) -> TemplateInfo {
        match self {
            ReportTemplate::Weekly => TemplateInfo {
                name: "Laporan Mingguan",
                icon: "📅",
                description: "Template untuk laporan progress mingguan",
                default_title: "Laporan Progress Mingguan",
                sections: &[
                    "Ringkasan Eksekutif",
                    "Pencapaian Minggu Ini",
                    "Kendala & Solusi",
                    "Rencana Minggu Depan",
                ],
                guidelines: &[
                    "Ringkas tapi comprehensive",
                    "Fokus pada deliverables minggu ini",
                    "Highlight blockers dan how they were resolved",
                    "Clear action items untuk minggu depan",
                ],
                tone: "Update-style, straightforward",
            },
            ReportTemplate::Monthly => TemplateInfo {
                name: "Laporan Bulanan",
                icon: "📆",
                description: "Template untuk laporan bulanan komprehensif",
                default_title: "Laporan Bulanan",
                sections: &[
                    "Executive Summary",
                    "Achievements & Milestones",
                    "Metrics & Analytics",
                    "Challenges & Learnings",
                    "Next Month Planning",
                ],
                guidelines: &[
                    "Comprehensive overview satu bulan penuh",
                    "Include metrics dan data-driven insights",
                    "Strategic analysis dan long-term impact",
                    "Quarterly alignment check",
                ],
                tone: "Analytical, strategic",
            },
            ReportTemplate::Project => TemplateInfo {
                name: "Laporan Project",
                icon: "🎯",
                description: "Template untuk laporan project/sprint",
                default_title: "Laporan Project",
                sections: &[
                    "Project Overview",
                    "Sprint Summary",
                    "Deliverables",
                    "Technical Implementation",
                    "Timeline & Next Steps",
                ],
                guidelines: &[
                    "Project-specific achievements",
                    "Sprint goals vs actual delivery",
                    "Technical implementation details",
                    "Dependencies dan blockers",
                ],
                tone: "Detail-oriented, technical",
            },
            ReportTemplate::Client => TemplateInfo {
                name: "Client Report",
                icon: "🤝",
                description: "Template formal untuk client/stakeholder",
                default_title: "Client Progress Report",
                sections: &[
                    "Executive Summary",
                    "Deliverables Status",
                    "Business Value",
                    "Risk Management",
                    "Recommendations",
                ],
                guidelines: &[
                    "Business-focused language (less technical jargon)",
                    "Emphasis on value delivery",
                    "Professional dan polished",
                    "Risk mitigation transparency",
                    "Clear ROI indicators",
                ],
                tone: "Professional, business-focused",
            },
            ReportTemplate::Technical => TemplateInfo {
                name: "Technical Report",
                icon: "💻",
                description: "Template detail untuk dokumentasi teknis",
                default_title: "Technical Documentation Report",
                sections: &[
                    "Technical Overview",
                    "Architecture & Design",
                    "Implementation Details",
                    "Testing & Quality",
                    "Performance Analysis",
                    "Technical Debt",
                ],
                guidelines: &[
                    "Deep technical details",
                    "Architecture diagrams description",
                    "Code quality metrics",
                    "Performance benchmarks",
                    "Technical decision rationale",
                ],
                tone: "Technical, detailed, expert-level",
            },
            ReportTemplate::Design => TemplateInfo {
                name: "Design Report",
                icon: "🎨",
                description: "Template untuk design deliverables",
                default_title: "Design Progress Report",
                sections: &[
                    "Design Concept",
                    "Visual Deliverables",
                    "Design System Updates",
                    "User Feedback",
                    "Next Iterations",
                ],
                guidelines: &[
                    "Visual-first approach",
                    "Design thinking process",
                    "User-centric insights",
                    "Iteration reasoning",
                    "Style guide updates",
                ],
                tone: "Creative, user-focused",
            },
        }
    }

    /// Prompt block naming the template's sections (numbered, bold) and its guidelines.
    pub fn instructions(&self) -> String {
        let info = self.info();
        let sections = info
            .sections
            .iter()
            .enumerate()
            .map(|(i, s)| format!("{}. **{}**", i + 1, s))
            .collect::<Vec<_>>()
            .join("\n");
        let guidelines = info
            .guidelines
            .iter()
            .map(|g| format!("- {g}"))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "TEMPLATE: {name}\n\n\
             Fokus pada sections berikut dengan detail yang sesuai template:\n\n\
             {sections}\n\n\
             GUIDELINES {upper} REPORT:\n\
             {guidelines}\n\
             - Tone: {tone}\n",
            name = info.name,
            upper = self.key().to_uppercase(),
            tone = info.tone,
        )
    }
}
