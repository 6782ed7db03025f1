use std::fmt;

use clap::ValueEnum;
use serde::Serialize;

/// Tables the admin tooling can dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum Table {
    Usuarios,
    Equipos,
    JugadoresEquipos,
    Partidos,
    Sets,
    EquiposPartidos,
}

impl Table {
    pub fn name(self) -> &'static str {
        match self {
            Table::Usuarios => "usuarios",
            Table::Equipos => "equipos",
            Table::JugadoresEquipos => "jugadores_equipos",
            Table::Partidos => "partidos",
            Table::Sets => "sets",
            Table::EquiposPartidos => "equipos_partidos",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PurgeSummary {
    pub matches: usize,
    pub sets: usize,
    pub outcomes: usize,
}
