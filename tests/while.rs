#[macro_use]
mod common;

#[cfg(test)]
mod while_stmt {
    tests! {
        count in while is OK
        "0"
        "1"
        "2"
    }

    tests! {
        condition_false in while is OK
        "done"
    }
}
