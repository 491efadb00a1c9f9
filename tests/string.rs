#[macro_use]
mod common;

#[cfg(test)]
mod string {
    tests! {
        concat in string is OK
        "foobar"
    }

    tests! {
        concat_chain in string is OK
        "abc"
    }

    tests! {
        multiline in string is OK
        "line one"
        "line two"
    }

    tests! {
        raw_contents in string is OK
        "with space"
    }

    tests! {
        unterminated in string is ERR
        "[line 1] Error: Unterminated string"
    }
}
