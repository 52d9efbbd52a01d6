/// Full name of the service shown on the login screen
pub const SERVICE_NAME: &str = "Sistem Pelayanan Administrasi Kecamatan Petarukan";

/// Storage key under which the bearer token is persisted
pub const TOKEN_STORAGE_KEY: &str = "token";

/// Default REST base URL for local development
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api";

/// Path segment under the backend origin where uploaded files are served
pub const STORAGE_PATH: &str = "storage";

/// MIME type used for file parts when the picked file reports none
pub const DEFAULT_FILE_MIME: &str = "application/octet-stream";

/// MIME type of the generated letter
pub const PDF_MIME: &str = "application/pdf";

/// Form key of the letter type tag in a new submission
pub const LETTER_TYPE_KEY: &str = "jenis_surat_id";

/// Form key used by the backend to spoof PUT on multipart requests
pub const METHOD_OVERRIDE_KEY: &str = "_method";

/// Date format accepted for date fields (ISO-8601 calendar date)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Extensions rendered as inline images in the detail view
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Extensions treated as downloadable documents in the detail view
pub const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "xls", "xlsx", "zip"];

/// Name of the multipart part carrying a dynamic field value.
pub fn field_part_name(field_id: i64) -> String {
    format!("fields[{field_id}]")
}

/// File name the generated letter is saved under.
pub fn letter_file_name(submission_id: i64) -> String {
    format!("surat_{submission_id}.pdf")
}
