use province_map_shared::{ProvinceData, ProvinceRaster};

/// Fetch and validate the province ID raster.
pub async fn fetch_province_raster(url: &str) -> Result<ProvinceRaster, String> {
    let resp = gloo_net::http::Request::get(url)
        .send()
        .await
        .map_err(|e| format!("fetch error: {e}"))?;

    if !resp.ok() {
        return Err(format!("HTTP {}", resp.status()));
    }

    let data = resp
        .json::<ProvinceData>()
        .await
        .map_err(|e| format!("parse error: {e}"))?;

    ProvinceRaster::from_data(data).map_err(|e| e.to_string())
}
