#[macro_use]
mod common;

#[cfg(test)]
mod block {
    tests! {
        nested in block is OK
        "outer"
        "inner"
        "outer"
    }

    tests! {
        empty in block is OK
        "ok"
    }
}
