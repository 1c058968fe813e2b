// src/utils/format.rs

//! Display formatting in the pt-BR conventions the site uses.

use chrono::{DateTime, Utc};

/// Format a price in BRL: `R$ 1.234,56`.
pub fn format_price(valor: f64) -> String {
    let negative = valor < 0.0;
    let cents = (valor.abs() * 100.0).round() as u64;
    let reais = cents / 100;
    let centavos = cents % 100;

    // Group the integer part with dots every three digits.
    let digits = reais.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i).is_multiple_of(3) {
            grouped.push('.');
        }
        grouped.push(c);
    }

    let sign = if negative { "-" } else { "" };
    format!("R$ {}{},{:02}", sign, grouped, centavos)
}

/// Format a timestamp as `dd/mm/yyyy`.
pub fn format_date(data: DateTime<Utc>) -> String {
    data.format("%d/%m/%Y").to_string()
}

/// Format a timestamp as `dd/mm/yyyy HH:MM`.
pub fn format_date_time(data: DateTime<Utc>) -> String {
    data.format("%d/%m/%Y %H:%M").to_string()
}

/// Human-readable time elapsed between `data` and `agora`.
///
/// Renders "agora mesmo" under one minute, otherwise "há N
/// minutos/horas/dias/meses" with singular forms at N = 1.
pub fn relative_time(data: DateTime<Utc>, agora: DateTime<Utc>) -> String {
    let elapsed = agora.signed_duration_since(data);

    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();
    let months = days / 30;

    if months > 0 {
        plural(months, "mês", "meses")
    } else if days > 0 {
        plural(days, "dia", "dias")
    } else if hours > 0 {
        plural(hours, "hora", "horas")
    } else if minutes > 0 {
        plural(minutes, "minuto", "minutos")
    } else {
        "agora mesmo".to_string()
    }
}

fn plural(n: i64, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("há {} {}", n, singular)
    } else {
        format!("há {} {}", n, plural)
    }
}
