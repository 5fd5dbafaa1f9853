//! 文件读取与预览地址

use fahsna::{AppError, AppResult, FileBlob};
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, FileList, Url};

/// 读取浏览器 File 的全部字节
pub async fn read_file(file: &File) -> AppResult<FileBlob> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| AppError::transport(format!("读取文件失败: {:?}", e)))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    Ok(FileBlob::new(file.name(), file.type_(), bytes))
}

pub fn list_files(list: &FileList) -> Vec<File> {
    (0..list.length()).filter_map(|i| list.get(i)).collect()
}

/// 为字节创建 object URL，调用方负责释放
pub fn create_preview(blob: &FileBlob) -> Option<String> {
    let js_blob = super::http::bytes_to_blob(&blob.bytes, &blob.mime_type).ok()?;
    Url::create_object_url_with_blob(&js_blob).ok()
}

pub fn revoke_preview(url: &str) {
    let _ = Url::revoke_object_url(url);
}
