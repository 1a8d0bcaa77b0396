// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting fragments.

/// Output formatting the document exporter can render: `**bold**` headings, bullet lists, no other markdown.
pub const PLAIN_TEXT_FORMATTING: &str = "\
FORMATTING RULES:
- Gunakan **text** untuk bold pada judul bagian utama, sub judul, dan poin-poin penting
- JANGAN gunakan markdown symbols lain (#, *, -, dll) kecuali **bold**
- Gunakan bullet • atau numbering untuk list items
- Setiap judul bagian dan sub-bagian harus di-bold dengan **";

/// Tone and language constraint shared by all formal documents.
pub const FORMAL_LANGUAGE: &str = "\
ATURAN BAHASA:
- Bahasa formal, profesional, Bahasa Indonesia baku
- Estimasi profesional untuk data yang tidak eksplisit (tandai dengan \"est.\")
- Fokus pada VALUE dan IMPACT, bukan hanya aktivitas";
