#[macro_use]
mod common;

#[cfg(test)]
mod logical_operator {
    tests! {
        and in logical_operator is OK
        "1"
        "false"
        "nil"
        "2"
    }

    tests! {
        or in logical_operator is OK
        "1"
        "yes"
        "nil"
        "false"
    }

    tests! {
        short_circuit in logical_operator is OK
        "before"
        "or"
        "or"
    }
}
