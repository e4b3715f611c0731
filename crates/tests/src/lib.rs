
#[cfg(test)]
mod policy_tests;


#[cfg(test)]
mod case_update_tests;


#[cfg(test)]
mod case_filter_tests;

#[cfg(test)]
mod auth_tests;


#[cfg(test)]
mod health_tests;
