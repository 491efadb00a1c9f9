#[macro_use]
mod common;

#[cfg(test)]
mod inheritance {
    tests! {
        inherit_method in inheritance is OK
        "hello"
    }

    tests! {
        override_method in inheritance is OK
        "derived"
        "base"
    }

    tests! {
        this_in_inherited_method in inheritance is OK
        "Derived"
    }

    tests! {
        inherit_init in inheritance is OK
        "7"
    }

    tests! {
        chain in inheritance is OK
        "A.foo"
    }
}
