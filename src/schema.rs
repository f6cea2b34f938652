// Logical schema shared by both backends. The DDL that realizes it per
// dialect lives in `db::backend`.

diesel::table! {
    device_states (id) {
        id -> Int8,
        group_name -> Text,
        device_name -> Text,
        status -> SmallInt,
        ts -> Timestamp,
    }
}

diesel::table! {
    important_params (id) {
        id -> Int8,
        param_name -> Text,
        value -> Float8,
        ts -> Timestamp,
    }
}
