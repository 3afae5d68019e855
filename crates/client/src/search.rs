use crm_core::customer::Customer;

/// Case-insensitive substring filter over a customer's text fields.
///
/// An empty (or all-whitespace) query matches everything.
pub fn filter_customers<'a>(customers: &'a [Customer], query: &str) -> Vec<&'a Customer> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return customers.iter().collect();
    }
    customers
        .iter()
        .filter(|c| matches_query(c, &needle))
        .collect()
}

fn matches_query(customer: &Customer, needle: &str) -> bool {
    let optional = [
        &customer.phone,
        &customer.address,
        &customer.company,
        &customer.notes,
    ];
    [customer.name.as_str(), customer.email.as_str()]
        .into_iter()
        .chain(optional.into_iter().filter_map(|f| f.as_deref()))
        .any(|text| text.to_lowercase().contains(needle))
}
