#[macro_use]
mod common;

#[cfg(test)]
mod field {
    tests! {
        get_set in field is OK
        "contents"
    }

    tests! {
        set_evaluates_to_value in field is OK
        "assigned"
    }

    tests! {
        fields_are_per_instance in field is OK
        "a"
        "b"
    }

    tests! {
        field_shadows_method in field is OK
        "method"
        "field"
    }

    tests! {
        undefined_property in field is ERR
        "Undefined property 'missing'."
        "[line 3]"
    }

    tests! {
        get_on_non_instance in field is ERR
        "Can not access property from a non-instance value."
        "[line 2]"
    }

    tests! {
        set_on_non_instance in field is ERR
        "Only objects have fields"
        "[line 1]"
    }
}
