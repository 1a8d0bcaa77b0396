use serde::Serialize;

use crate::llm_client::ChatMessage;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    #[default]
    Surat,
    Proposal,
    Email,
    Memo,
    Laporan,
    Sop,
}

impl DocumentType {
    pub const ALL: [DocumentType; 6] = [
        DocumentType::Surat,
        DocumentType::Proposal,
        DocumentType::Email,
        DocumentType::Memo,
        DocumentType::Laporan,
        DocumentType::Sop,
    ];

    /// Unknown or missing names fall back to a formal letter (`surat`).
    pub fn parse(name: Option<&str>) -> Self {
        let name = name.map(str::trim).unwrap_or_default();
        Self::ALL
            .into_iter()
            .find(|t| t.key().eq_ignore_ascii_case(name))
            .unwrap_or_default()
    }

    pub fn key(&self) -> &'static str {
        match self {
            DocumentType::Surat => "surat",
            DocumentType::Proposal => "proposal",
            DocumentType::Email => "email",
            DocumentType::Memo => "memo",
            DocumentType::Laporan => "laporan",
            DocumentType::Sop => "sop",
        }
    }

    pub fn instructions(&self) -> &'static str {
        match self {
            DocumentType::Surat => "\
Format surat resmi Indonesia dengan struktur:
- Kop surat (placeholder)
- Nomor, Lampiran, Perihal
- Tanggal
- Kepada Yth. [tujuan]
- Salam pembuka
- Isi surat (paragraf pembuka, isi, penutup)
- Salam penutup
- Nama dan jabatan pengirim",
            DocumentType::Proposal => "\
Format proposal profesional dengan struktur:
- Judul Proposal
- Latar Belakang
- Tujuan
- Ruang Lingkup
- Metodologi/Pendekatan
- Timeline
- Budget (estimasi jika relevan)
- Penutup
Gunakan bahasa formal dan meyakinkan.",
            DocumentType::Email => "\
Format email profesional dengan:
- Subject line yang jelas
- Greeting yang tepat
- Paragraf pembuka (context)
- Isi utama (poin-poin penting)
- Call to action (jika ada)
- Penutup profesional
- Signature",
            DocumentType::Memo => "\
Format memo/pengumuman dengan:
- MEMO/PENGUMUMAN (header)
- Kepada: [penerima]
- Dari: [pengirim]
- Tanggal:
- Perihal:
- Isi pengumuman (singkat, jelas, terstruktur)
- Penutup",
            DocumentType::Laporan => "\
Format laporan singkat dengan:
- Judul Laporan
- Ringkasan Eksekutif
- Latar Belakang
- Temuan/Hasil
- Analisis
- Kesimpulan
- Rekomendasi",
            DocumentType::Sop => "\
Format SOP (Standard Operating Procedure) dengan:
- Judul SOP
- Tujuan
- Ruang Lingkup
- Definisi/Istilah
- Prosedur (step-by-step numbered)
- Penanggung Jawab
- Dokumen Terkait
Gunakan bahasa yang sangat jelas dan actionable.",
        }
    }
}

const WRITER_REQUIREMENTS: &str = "\
CRITICAL REQUIREMENTS:
- Output PLAIN TEXT tanpa markdown symbols (#, **, *, -, dll)
- Bahasa Indonesia formal, baku, dan profesional tingkat tinggi
- Format sesuai standar industri dan best practices
- Comprehensive tapi concise, tidak bertele-tele
- Actionable dan clear dalam setiap instruksi atau poin
- Gunakan placeholder [brackets] untuk data yang perlu diisi user";

pub fn writer_system_prompt(doc_type: DocumentType) -> String {
    format!(
        "Kamu adalah Gia, specialist dalam menyusun dokumen profesional.\n\n\
         JENIS DOKUMEN: {}\n\n{}\n\n{WRITER_REQUIREMENTS}",
        doc_type.key(),
        doc_type.instructions(),
    )
}

pub fn build_writer_messages(doc_type: DocumentType, prompt: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(writer_system_prompt(doc_type)),
        ChatMessage::user(format!(
            "Buatkan dokumen {} dengan detail berikut:\n\n{prompt}\n\n\
             Buat dokumen yang lengkap, profesional, dan siap digunakan.",
            doc_type.key()
        )),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_falls_back_to_surat() {
        assert_eq!(DocumentType::parse(Some("Proposal")), DocumentType::Proposal);
        assert_eq!(DocumentType::parse(Some(" sop ")), DocumentType::Sop);
        assert_eq!(DocumentType::parse(Some("puisi")), DocumentType::Surat);
        assert_eq!(DocumentType::parse(None), DocumentType::Surat);
    }

    #[test]
    fn test_system_prompt_carries_type_instructions() {
        let prompt = writer_system_prompt(DocumentType::Memo);
        assert!(prompt.contains("JENIS DOKUMEN: memo"));
        assert!(prompt.contains("MEMO/PENGUMUMAN (header)"));
        assert!(prompt.contains("PLAIN TEXT"));
    }

    #[test]
    fn test_user_message_embeds_request() {
        let messages = build_writer_messages(DocumentType::Email, "undangan rapat Senin");
        assert_eq!(messages.len(), 2);
        assert!(messages[1].content.starts_with("Buatkan dokumen email"));
        assert!(messages[1].content.contains("undangan rapat Senin"));
    }
}
