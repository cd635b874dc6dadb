use poem_openapi::Object;
use registry_provider::{Customer, CustomerDetails};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Object)]
#[serde(rename_all = "camelCase")]
#[oai(rename_all = "camelCase")]
pub struct CustomerDetailsDef {
    pub name: String,
    pub address: String,
    pub contact_no: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Object)]
#[serde(rename_all = "camelCase")]
#[oai(rename_all = "camelCase")]
pub struct CustomerDef {
    pub id: String,
    pub customer_details: CustomerDetailsDef,
}

impl From<CustomerDetails> for CustomerDetailsDef {
    fn from(v: CustomerDetails) -> Self {
        Self {
            name: v.name,
            address: v.address,
            contact_no: v.contact_no,
        }
    }
}

impl From<CustomerDetailsDef> for CustomerDetails {
    fn from(v: CustomerDetailsDef) -> Self {
        Self {
            name: v.name,
            address: v.address,
            contact_no: v.contact_no,
        }
    }
}

impl From<Customer> for CustomerDef {
    fn from(v: Customer) -> Self {
        Self {
            id: v.id,
            customer_details: v.customer_details.into(),
        }
    }
}

impl From<CustomerDef> for Customer {
    fn from(v: CustomerDef) -> Self {
        Self {
            id: v.id,
            customer_details: v.customer_details.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn des_customer_def() {
        let s = r#"{"id":"hs","customerDetails":{"name":"hardik","address":"udaipur","contactNo":9999999999}}"#;
        let c: CustomerDef = serde_json::from_str(s).unwrap();
        let c: Customer = c.into();
        assert_eq!(c, Customer::new("hs", "hardik", "udaipur", 9999999999));
        assert_eq!(serde_json::to_string(&CustomerDef::from(c)).unwrap(), s);
    }
}
