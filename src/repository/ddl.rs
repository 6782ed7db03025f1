use crate::error::RegistryError;
use diesel::connection::SimpleConnection;
use diesel::Connection;

/// SQL flavour the schema is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Sqlite,
    Postgres,
}

#[derive(Debug, Clone, Copy)]
enum SqlType {
    Serial,
    Integer,
    Text,
    Boolean,
    Date,
    Timestamp,
}

impl Dialect {
    fn type_name(self, ty: SqlType) -> &'static str {
        match (self, ty) {
            (Dialect::Sqlite, SqlType::Serial) => "INTEGER PRIMARY KEY AUTOINCREMENT",
            (Dialect::Postgres, SqlType::Serial) => "SERIAL PRIMARY KEY",
            (_, SqlType::Integer) => "INTEGER",
            (_, SqlType::Text) => "TEXT",
            (_, SqlType::Boolean) => "BOOLEAN",
            (_, SqlType::Date) => "DATE",
            (_, SqlType::Timestamp) => "TIMESTAMP",
        }
    }
}

#[derive(Debug)]
struct Column {
    name: &'static str,
    ty: SqlType,
    modifiers: &'static str,
}

const fn column(name: &'static str, ty: SqlType, modifiers: &'static str) -> Column {
    Column {
        name,
        ty,
        modifiers,
    }
}

#[derive(Debug)]
pub struct TableDef {
    pub name: &'static str,
    columns: &'static [Column],
    constraints: &'static [&'static str],
}

impl TableDef {
    pub fn create_statement(&self, dialect: Dialect) -> String {
        let mut lines: Vec<String> = self
            .columns
            .iter()
            .map(|column| {
                let ty = dialect.type_name(column.ty);
                if column.modifiers.is_empty() {
                    format!("    {} {}", column.name, ty)
                } else {
                    format!("    {} {} {}", column.name, ty, column.modifiers)
                }
            })
            .collect();
        lines.extend(self.constraints.iter().map(|c| format!("    {c}")));
        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n{}\n);",
            self.name,
            lines.join(",\n")
        )
    }
}

/// Every table, parents before children.
pub const TABLES: [TableDef; 6] = [
    TableDef {
        name: "usuarios",
        columns: &[
            column("id", SqlType::Serial, ""),
            column("nombre", SqlType::Text, "NOT NULL"),
            column("nickname", SqlType::Text, "NOT NULL UNIQUE"),
            column(
                "fecha_registro",
                SqlType::Timestamp,
                "NOT NULL DEFAULT CURRENT_TIMESTAMP",
            ),
        ],
        constraints: &[],
    },
    TableDef {
        name: "equipos",
        columns: &[
            column("id", SqlType::Serial, ""),
            column("nombre", SqlType::Text, "NOT NULL UNIQUE"),
        ],
        constraints: &[],
    },
    TableDef {
        name: "jugadores_equipos",
        columns: &[
            column("equipo_id", SqlType::Integer, "NOT NULL REFERENCES equipos (id)"),
            column("usuario_id", SqlType::Integer, "NOT NULL REFERENCES usuarios (id)"),
            column("estado_de_pago", SqlType::Boolean, ""),
        ],
        constraints: &["PRIMARY KEY (equipo_id, usuario_id)"],
    },
    TableDef {
        name: "partidos",
        columns: &[
            column("id", SqlType::Serial, ""),
            column("fecha", SqlType::Date, "NOT NULL"),
            column("lugar", SqlType::Text, "NOT NULL"),
            column("cancha", SqlType::Text, ""),
            column("costo_partido", SqlType::Integer, "CHECK (costo_partido >= 0)"),
            column("partido_con_descuento", SqlType::Boolean, ""),
            column("creado_por", SqlType::Integer, "REFERENCES usuarios (id)"),
            column("equipo_1_id", SqlType::Integer, "NOT NULL REFERENCES equipos (id)"),
            column("equipo_2_id", SqlType::Integer, "NOT NULL REFERENCES equipos (id)"),
        ],
        constraints: &["CHECK (equipo_1_id <> equipo_2_id)"],
    },
    TableDef {
        name: "sets",
        columns: &[
            column("id", SqlType::Serial, ""),
            column("partido_id", SqlType::Integer, "NOT NULL REFERENCES partidos (id)"),
            column(
                "numero_set",
                SqlType::Integer,
                "NOT NULL CHECK (numero_set BETWEEN 1 AND 3)",
            ),
            column(
                "equipo_1_puntos",
                SqlType::Integer,
                "NOT NULL CHECK (equipo_1_puntos >= 0)",
            ),
            column(
                "equipo_2_puntos",
                SqlType::Integer,
                "NOT NULL CHECK (equipo_2_puntos >= 0)",
            ),
        ],
        constraints: &["UNIQUE (partido_id, numero_set)"],
    },
    TableDef {
        name: "equipos_partidos",
        columns: &[
            column("partido_id", SqlType::Integer, "NOT NULL REFERENCES partidos (id)"),
            column("equipo_id", SqlType::Integer, "NOT NULL REFERENCES equipos (id)"),
            column(
                "resultado",
                SqlType::Text,
                "NOT NULL CHECK (resultado IN ('Ganador', 'Perdedor', 'Empate'))",
            ),
        ],
        constraints: &["PRIMARY KEY (partido_id, equipo_id)"],
    },
];

pub fn create_statements(dialect: Dialect) -> Vec<String> {
    TABLES
        .iter()
        .map(|table| table.create_statement(dialect))
        .collect()
}

pub trait SchemaStore {
    fn dialect(&self) -> Dialect;

    /// Creates any missing table. All statements share one transaction.
    fn ensure_schema(&mut self) -> Result<(), RegistryError>;
}

macro_rules! impl_schema_store {
    ($conn:ty, $dialect:expr) => {
        impl SchemaStore for $conn {
            fn dialect(&self) -> Dialect {
                $dialect
            }

            fn ensure_schema(&mut self) -> Result<(), RegistryError> {
                let dialect = self.dialect();
                self.transaction::<_, RegistryError, _>(|conn| {
                    for table in TABLES.iter() {
                        conn.batch_execute(&table.create_statement(dialect))
                            .map_err(|err| RegistryError::write(table.name, err))?;
                    }
                    Ok(())
                })
            }
        }
    };
}

impl_schema_store!(diesel::SqliteConnection, Dialect::Sqlite);
#[cfg(feature = "postgres")]
impl_schema_store!(diesel::PgConnection, Dialect::Postgres);
