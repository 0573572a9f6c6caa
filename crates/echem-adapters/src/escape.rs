//! Escapado por formato y saneado de texto libre.
//!
//! Cada función de escapado procesa primero la barra invertida (para no
//! escapar dos veces), luego la comilla y los saltos de línea, tabuladores y
//! retornos de carro. El resto de caracteres no imprimibles en el formato
//! destino se escriben como escape hexadecimal. `None` produce `""`.

/// Longitud máxima por defecto del texto libre embebido en la salida.
pub const DEFAULT_MAX_TEXT_LEN: usize = 500;

fn escape_with(input: Option<&str>, printable: fn(char) -> bool) -> String {
    let Some(s) = input else { return String::new() };
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if printable(c) => out.push(c),
            c => out.push_str(&hex_escape(c)),
        }
    }
    out
}

/// `\xNN`, `\uNNNN` o `\UNNNNNNNN`; YAML y Python entienden las tres.
fn hex_escape(c: char) -> String {
    match c as u32 {
        n @ 0..=0xFF => format!("\\x{n:02X}"),
        n @ 0x100..=0xFFFF => format!("\\u{n:04X}"),
        n => format!("\\U{n:08X}"),
    }
}

/// Conjunto imprimible de YAML 1.2 para escalares con comillas dobles.
/// Fuera quedan C0, DEL, C1 (incluido NEL), el BOM y U+FFFE/U+FFFF.
fn yaml_printable(c: char) -> bool {
    c != '\u{FEFF}'
        && matches!(c, '\u{20}'..='\u{7E}' | '\u{A0}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}

/// En un literal Python sólo C0 y DEL se escriben escapados.
fn python_printable(c: char) -> bool {
    !matches!(c, '\u{0}'..='\u{1F}' | '\u{7F}')
}

/// Contenido de un escalar YAML entre comillas dobles.
pub fn escape_yaml_like(input: Option<&str>) -> String {
    escape_with(input, yaml_printable)
}

/// Contenido de un literal de string Python entre comillas dobles. También
/// vale dentro del docstring: ninguna `"` queda sin escapar.
pub fn escape_python(input: Option<&str>) -> String {
    escape_with(input, python_printable)
}

/// Quita caracteres de control C0 (salvo tab, LF y CR) y trunca a
/// `max_len` caracteres (500 si no se indica).
pub fn sanitize_text(input: Option<&str>, max_len: Option<usize>) -> String {
    let max_len = max_len.unwrap_or(DEFAULT_MAX_TEXT_LEN);
    input
        .unwrap_or_default()
        .chars()
        .filter(|c| (*c as u32) >= 0x20 || matches!(c, '\t' | '\n' | '\r'))
        .take(max_len)
        .collect()
}
