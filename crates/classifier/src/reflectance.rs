//! Synthetic channel-3b reflectance.
//!
//! During daylight the 3.7 µm radiance is the sum of emitted thermal
//! radiance and reflected sunlight. The emitted part is estimated from the
//! 11 µm brightness temperature, and the remainder is expressed as a
//! fraction of the incoming solar radiance at the channel wavenumber.

use crate::error::Reflectance3bError;
use crate::pixel::is_available;

/// First radiation constant, mW/(m² sr cm⁻⁴)
const C1: f64 = 1.191042e-5;
/// Second radiation constant, K cm
const C2: f64 = 1.4387752;

const SUN_TEMPERATURE_K: f64 = 5778.0;
const SUN_RADIUS_KM: f64 = 6.957e5;
const ASTRONOMICAL_UNIT_KM: f64 = 1.496e8;

/// Channel-3b response of one platform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Channel3bResponse {
    /// Central wavenumber (cm⁻¹)
    pub nu_c: f64,
    /// Band correction offset (K)
    pub a: f64,
    /// Band correction slope
    pub b: f64,
}

impl Channel3bResponse {
    const fn new(nu_c: f64, a: f64, b: f64) -> Self {
        Self { nu_c, a, b }
    }

    /// Radiance of a brightness temperature, mW/(m² sr cm⁻¹).
    pub fn radiance(&self, temperature: f64) -> f64 {
        planck(self.nu_c, self.a + self.b * temperature)
    }

    /// Solar irradiance at 1 AU in the channel, mW/(m² cm⁻¹).
    pub fn solar_irradiance(&self) -> f64 {
        let solid_angle = (SUN_RADIUS_KM / ASTRONOMICAL_UNIT_KM).powi(2);
        std::f64::consts::PI * planck(self.nu_c, SUN_TEMPERATURE_K) * solid_angle
    }
}

const AVHRR_NOAA15: Channel3bResponse = Channel3bResponse::new(2695.9743, 1.621256, 0.998015);
const AVHRR_NOAA16: Channel3bResponse = Channel3bResponse::new(2700.1148, 1.592459, 0.998147);
const AVHRR_NOAA17: Channel3bResponse = Channel3bResponse::new(2669.3554, 1.702380, 0.997378);
const AVHRR_NOAA18: Channel3bResponse = Channel3bResponse::new(2659.7952, 1.698704, 0.996960);
const AVHRR_NOAA19: Channel3bResponse = Channel3bResponse::new(2670.0, 1.67396, 0.997364);
const AVHRR_METOP: Channel3bResponse = Channel3bResponse::new(2687.0, 2.06699, 0.996577);
const VIIRS_M12: Channel3bResponse = Channel3bResponse::new(2703.0, 0.0, 1.0);

/// Channel-3b response for a platform name such as "NOAA-19" or "Metop-B".
pub fn channel3b_response(platform: &str) -> Option<Channel3bResponse> {
    let key: String = platform
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase();

    let response = match key.as_str() {
        "noaa15" => AVHRR_NOAA15,
        "noaa16" => AVHRR_NOAA16,
        "noaa17" => AVHRR_NOAA17,
        "noaa18" => AVHRR_NOAA18,
        "noaa19" => AVHRR_NOAA19,
        "metopa" | "metop02" | "metopb" | "metop01" | "metopc" | "metop03" => AVHRR_METOP,
        "npp" | "snpp" | "suominpp" | "noaa20" | "j01" | "jpss1" | "noaa21" | "j02" | "jpss2" => {
            VIIRS_M12
        }
        _ => return None,
    };
    Some(response)
}

/// Planck radiance at wavenumber `nu` (cm⁻¹) and temperature (K).
pub fn planck(nu: f64, temperature: f64) -> f64 {
    C1 * nu.powi(3) / ((C2 * nu / temperature).exp() - 1.0)
}

/// Earth-Sun distance in AU for a day of year.
pub fn earth_sun_distance(day_of_year: u32) -> f64 {
    1.0 - 0.01672 * (0.9856 * (day_of_year as f64 - 4.0)).to_radians().cos()
}

/// Reflectance (percent) hidden in the 3.7 µm channel.
pub fn reflectance_3b(
    t3b: f64,
    t4: f64,
    solar_zenith: f64,
    platform: &str,
    day_of_year: u32,
) -> Result<f64, Reflectance3bError> {
    let response = channel3b_response(platform)
        .ok_or_else(|| Reflectance3bError::UnknownPlatform(platform.to_string()))?;

    if !is_available(t3b) || !is_available(t4) || !is_available(solar_zenith) {
        return Err(Reflectance3bError::MissingInput);
    }

    let cos_sza = solar_zenith.to_radians().cos();
    if cos_sza <= 0.0 {
        return Err(Reflectance3bError::NoSolarSignal(solar_zenith));
    }

    let d = earth_sun_distance(day_of_year);
    let solar = response.solar_irradiance() * cos_sza / (std::f64::consts::PI * d * d);
    let emitted = response.radiance(t4);
    let total = response.radiance(t3b);

    let denominator = solar - emitted;
    if !(denominator.is_finite() && denominator > 0.0) {
        return Err(Reflectance3bError::NoSolarSignal(solar_zenith));
    }

    Ok(100.0 * (total - emitted) / denominator)
}
