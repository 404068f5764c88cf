use std::io::{self, Write};

/// Confirmation printed to stdout once the database is ready.
pub const STATUS_LINES: [&str; 3] = [
    "✅ Base de datos inicializada correctamente",
    "📊 Colecciones creadas: users, expenses",
    "🔍 Índices creados para optimizar consultas",
];

pub fn emit_status<W: Write>(out: &mut W) -> io::Result<()> {
    for line in STATUS_LINES {
        writeln!(out, "{}", line)?;
    }
    out.flush()
}
