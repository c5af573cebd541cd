// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::DomainError;

#[test]
fn test_domain_error_display() {
    let err: DomainError = DomainError::LicenseNumberLength { length: 6 };
    assert_eq!(
        format!("{err}"),
        "License number should consist of 8 characters"
    );

    let err: DomainError = DomainError::LicenseNumberPrefix;
    assert_eq!(
        format!("{err}"),
        "First 3 characters should be uppercase letters"
    );

    let err: DomainError = DomainError::LicenseNumberSuffix;
    assert_eq!(format!("{err}"), "Last 5 characters should be digits");

    let err: DomainError = DomainError::RequiredField { field: "model" };
    assert_eq!(format!("{err}"), "This field is required.");

    let err: DomainError = DomainError::FieldTooLong {
        field: "name",
        max: 255,
        length: 300,
    };
    assert_eq!(
        format!("{err}"),
        "Ensure this value has at most 255 characters (it has 300)."
    );
}
