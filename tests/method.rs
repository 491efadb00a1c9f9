#[macro_use]
mod common;

#[cfg(test)]
mod method {
    tests! {
        call_method in method is OK
        "hello"
    }

    tests! {
        bound_method_keeps_this in method is OK
        "ada"
    }

    tests! {
        methods_see_fields in method is OK
        "15"
    }
}
