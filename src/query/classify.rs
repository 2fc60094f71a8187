use crate::core::types::TrafficLight;

/// 状态文本 -> 红绿灯（不区分大小写）
pub fn classify_status(value: &str) -> TrafficLight {
    match value.to_lowercase().as_str() {
        "ok" => TrafficLight::Green,
        "en curso" => TrafficLight::Amber,
        "nok" => TrafficLight::Red,
        _ => TrafficLight::Neutral,
    }
}

/// 额度使用率 -> 红绿灯：>=100 超限，>=80 接近上限
pub fn classify_credit_percentage(value: &str) -> TrafficLight {
    match value.trim().parse::<f64>() {
        Ok(pct) if pct >= 100.0 => TrafficLight::Red,
        Ok(pct) if pct >= 80.0 => TrafficLight::Amber,
        Ok(_) => TrafficLight::Green,
        Err(_) => TrafficLight::Neutral,
    }
}
