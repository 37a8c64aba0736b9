pub mod common;



#[cfg(test)]
mod test_held_items;

#[cfg(test)]
mod test_items;

#[cfg(test)]
mod test_switch;
