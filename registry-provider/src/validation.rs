use crate::{Customer, RegistryError};

pub const ID_LENGTH: usize = 2;
pub const CONTACT_NO_DIGITS: u32 = 10;

/// Number of decimal digits of `|num|`, `0` has no digits.
pub fn count_digits(num: i64) -> u32 {
    let mut num = num.unsigned_abs();
    let mut count = 0;
    while num != 0 {
        num /= 10;
        count += 1;
    }
    count
}

pub fn validate_id(id: &str) -> Result<(), RegistryError> {
    if id.chars().count() != ID_LENGTH {
        return Err(RegistryError::InvalidId(id.to_string()));
    }
    Ok(())
}

/**
 * Contact number must be a positive number with exactly 10 digits
 */
pub fn validate_contact_no(contact_no: i64) -> Result<(), RegistryError> {
    if contact_no <= 0 || count_digits(contact_no) != CONTACT_NO_DIGITS {
        return Err(RegistryError::InvalidContactNo(contact_no));
    }
    Ok(())
}

/**
 * Id is checked first, so an invalid id wins over an invalid contact number
 */
pub fn validate_customer(customer: &Customer) -> Result<(), RegistryError> {
    validate_id(&customer.id)?;
    validate_contact_no(customer.customer_details.contact_no)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_digits() {
        assert_eq!(count_digits(0), 0);
        assert_eq!(count_digits(7), 1);
        assert_eq!(count_digits(999999), 6);
        assert_eq!(count_digits(9999999999), 10);
        assert_eq!(count_digits(-9999999999), 10);
        assert_eq!(count_digits(i64::MIN), 19);
    }

    #[test]
    fn test_validate_id() {
        assert!(validate_id("hs").is_ok());
        assert!(validate_id("z9").is_ok());
        assert!(validate_id("ñé").is_ok());
        assert_eq!(validate_id(""), Err(RegistryError::InvalidId("".to_string())));
        assert_eq!(validate_id("h"), Err(RegistryError::InvalidId("h".to_string())));
        assert_eq!(
            validate_id("hsv"),
            Err(RegistryError::InvalidId("hsv".to_string()))
        );
    }

    #[test]
    fn test_validate_contact_no() {
        assert!(validate_contact_no(9999999999).is_ok());
        assert!(validate_contact_no(1000000000).is_ok());
        assert_eq!(
            validate_contact_no(999999999),
            Err(RegistryError::InvalidContactNo(999999999))
        );
        assert_eq!(
            validate_contact_no(10000000000),
            Err(RegistryError::InvalidContactNo(10000000000))
        );
        assert_eq!(validate_contact_no(0), Err(RegistryError::InvalidContactNo(0)));
        assert_eq!(
            validate_contact_no(-9999999999),
            Err(RegistryError::InvalidContactNo(-9999999999))
        );
    }

    #[test]
    fn test_validate_customer_order() {
        let c = Customer::new("hsv", "hardik", "udaipur", 999999);
        assert_eq!(
            validate_customer(&c),
            Err(RegistryError::InvalidId("hsv".to_string()))
        );
        let c = Customer::new("hs", "hardik", "udaipur", 999999);
        assert_eq!(
            validate_customer(&c),
            Err(RegistryError::InvalidContactNo(999999))
        );
        let c = Customer::new("hs", "hardik", "udaipur", 9999999999);
        assert!(validate_customer(&c).is_ok());
    }
}
