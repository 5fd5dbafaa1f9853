//! HTTP 请求封装模块
//!
//! 用 `web_sys::fetch` 实现核心库的 `HttpClient`。

use fahsna::request::{FormPart, HttpBody, HttpRequest, HttpResponse, MultipartForm};
use fahsna::{AppError, AppResult, HttpClient};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, FormData, Headers, Request, RequestInit, Response};

fn js_err(context: &str, e: JsValue) -> AppError {
    AppError::transport(format!("{}: {:?}", context, e))
}

/// 把字节复制为带类型的 Blob
pub fn bytes_to_blob(bytes: &[u8], mime_type: &str) -> Result<Blob, JsValue> {
    let array = js_sys::Uint8Array::from(bytes);
    let parts = js_sys::Array::of1(&array);
    let options = BlobPropertyBag::new();
    options.set_type(mime_type);
    Blob::new_with_u8_array_sequence_and_options(&parts, &options)
}

fn to_form_data(form: &MultipartForm) -> Result<FormData, JsValue> {
    let data = FormData::new()?;
    for part in &form.parts {
        match part {
            FormPart::Text { name, value } => data.append_with_str(name, value)?,
            FormPart::File { name, file } => {
                let blob = bytes_to_blob(&file.bytes, &file.mime_type)?;
                data.append_with_blob_and_filename(name, &blob, &file.name)?
            }
        }
    }
    Ok(data)
}

/// 基于 fetch 的客户端
///
/// multipart 请求不设置 Content-Type，由浏览器生成 boundary。
#[derive(Clone, Copy, Default)]
pub struct FetchHttpClient;

#[async_trait::async_trait(?Send)]
impl HttpClient for FetchHttpClient {
    async fn send(&self, req: HttpRequest) -> AppResult<HttpResponse> {
        let headers = Headers::new().map_err(|e| js_err("创建 Headers 失败", e))?;
        for (key, value) in &req.headers {
            headers
                .set(key, value)
                .map_err(|e| js_err("设置 Header 失败", e))?;
        }

        let opts = RequestInit::new();
        opts.set_method(req.method.as_str());
        opts.set_headers(&headers.into());

        match &req.body {
            Some(HttpBody::Json(body)) => opts.set_body(&JsValue::from_str(body)),
            Some(HttpBody::Multipart(form)) => {
                let data = to_form_data(form).map_err(|e| js_err("构建 FormData 失败", e))?;
                opts.set_body(&data.into());
            }
            None => {}
        }

        let request = Request::new_with_str_and_init(&req.url, &opts)
            .map_err(|e| js_err("请求构建失败", e))?;

        let window = web_sys::window().ok_or_else(|| AppError::transport("无法获取 window 对象"))?;

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| js_err("网络错误", e))?;

        let response: Response = resp_value
            .dyn_into()
            .map_err(|e| AppError::decode(format!("Response 类型转换失败: {:?}", e)))?;

        let promise = response
            .text()
            .map_err(|e| AppError::decode(format!("{:?}", e)))?;
        let text = JsFuture::from(promise)
            .await
            .map_err(|e| AppError::decode(format!("{:?}", e)))?;

        Ok(HttpResponse {
            status: response.status(),
            body: text.as_string().unwrap_or_default(),
        })
    }
}
