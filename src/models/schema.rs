// Mirrors the tables created by `repository::ddl`. Keep both in step.

diesel::table! {
    usuarios (id) {
        id -> Integer,
        nombre -> Text,
        nickname -> Text,
        fecha_registro -> Timestamp,
    }
}

diesel::table! {
    equipos (id) {
        id -> Integer,
        nombre -> Text,
    }
}

diesel::table! {
    jugadores_equipos (equipo_id, usuario_id) {
        equipo_id -> Integer,
        usuario_id -> Integer,
        estado_de_pago -> Nullable<Bool>,
    }
}

diesel::table! {
    partidos (id) {
        id -> Integer,
        fecha -> Date,
        lugar -> Text,
        cancha -> Nullable<Text>,
        costo_partido -> Nullable<Integer>,
        partido_con_descuento -> Nullable<Bool>,
        creado_por -> Nullable<Integer>,
        equipo_1_id -> Integer,
        equipo_2_id -> Integer,
    }
}

diesel::table! {
    sets (id) {
        id -> Integer,
        partido_id -> Integer,
        numero_set -> Integer,
        equipo_1_puntos -> Integer,
        equipo_2_puntos -> Integer,
    }
}

diesel::table! {
    equipos_partidos (partido_id, equipo_id) {
        partido_id -> Integer,
        equipo_id -> Integer,
        resultado -> Text,
    }
}

diesel::joinable!(jugadores_equipos -> equipos (equipo_id));
diesel::joinable!(jugadores_equipos -> usuarios (usuario_id));
diesel::joinable!(sets -> partidos (partido_id));
diesel::joinable!(equipos_partidos -> partidos (partido_id));
diesel::joinable!(equipos_partidos -> equipos (equipo_id));

diesel::allow_tables_to_appear_in_same_query!(
    usuarios,
    equipos,
    jugadores_equipos,
    partidos,
    sets,
    equipos_partidos,
);
