mod test_containment_basic;
