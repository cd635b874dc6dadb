use registry_provider::Customer;

pub fn sample_customers() -> Vec<Customer> {
    vec![
        Customer::new("hs", "hardik", "udaipur", 9999999999),
        Customer::new("ht", "hardik", "udaipur", 9649127559),
        Customer::new("rk", "rakesh", "jaipur", 9828012345),
    ]
}
