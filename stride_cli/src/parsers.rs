use stride_core::lat_lng::LatLng;

/// Parses `lat,lng` in degrees.
pub fn parse_lat_lng(input: &str) -> Result<LatLng, String> {
    let Some((lat, lng)) = input.split_once(',') else {
        return Err(format!("Expected `lat,lng`, got `{input}`"));
    };

    let lat = lat
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("Invalid latitude `{}`", lat.trim()))?;
    let lng = lng
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("Invalid longitude `{}`", lng.trim()))?;

    if !(-90.0..=90.0).contains(&lat) {
        return Err(format!("Latitude {lat} is out of range"));
    }

    if !(-180.0..=180.0).contains(&lng) {
        return Err(format!("Longitude {lng} is out of range"));
    }

    Ok(LatLng::new(lat, lng))
}
