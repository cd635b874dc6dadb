use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetails {
    pub name: String,
    pub address: String,
    pub contact_no: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub customer_details: CustomerDetails,
}

impl Customer {
    pub fn new(
        id: impl ToString,
        name: impl ToString,
        address: impl ToString,
        contact_no: i64,
    ) -> Self {
        Self {
            id: id.to_string(),
            customer_details: CustomerDetails {
                name: name.to_string(),
                address: address.to_string(),
                contact_no,
            },
        }
    }
}
