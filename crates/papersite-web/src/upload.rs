use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;

/// Name of the multipart field that carries the document.
pub const FILE_FIELD: &str = "file";

/// An uploaded file with its data and metadata.
#[derive(Debug)]
pub struct UploadedFile {
    pub filename: String,
    /// Content type declared by the client for this part, if any.
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// Pull the `file` part out of a multipart form. Other fields are drained
/// and ignored; a `file` field without a filename is not a file.
pub async fn read_file_field(mut multipart: Multipart) -> Result<Option<UploadedFile>, MultipartError> {
    let mut file = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) || field.file_name().is_none() {
            let _ = field.bytes().await?;
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await?.to_vec();

        file.get_or_insert(UploadedFile {
            filename,
            content_type,
            data,
        });
    }

    Ok(file)
}
